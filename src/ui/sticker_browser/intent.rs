//! Intents for the sticker browser.

use crate::services::QueryResult;
use crate::ui::mvi::Intent;
use crate::ui::presentation::PresentationStyle;

use super::state::ActionButtonType;

#[derive(Debug)]
pub enum StickerBrowserIntent {
    /// Action button tapped; carries the type it showed at the time.
    ActionButtonTapped(ActionButtonType),
    /// Host switched presentation style.
    PresentationStyleChanged(PresentationStyle),
    /// Item at this index of the current section list selected.
    ItemSelected(usize),
    /// Live store query produced a new result.
    StickersChanged(QueryResult),
}

impl Intent for StickerBrowserIntent {}
