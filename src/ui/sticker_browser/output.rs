use crate::ui::presentation::PresentationStyle;

use super::section::StickerSectionItem;
use super::state::ActionButtonType;

/// Signals the browser screen renders from.
#[derive(Debug, Clone)]
pub enum StickerBrowserOutput {
    /// Full replacement of the list.
    SectionItems(Vec<StickerSectionItem>),
    NavigationBarHidden(bool),
    ActionButtonType(ActionButtonType),
    /// Ask the host to switch presentation style.
    RequestPresentationStyle(PresentationStyle),
    /// An item was selected; the matching step has been emitted.
    OpenStickerItem(StickerSectionItem),
}
