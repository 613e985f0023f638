//! State for the sticker browser.

use crate::model::Sticker;
use crate::ui::mvi::UiState;
use crate::ui::presentation::PresentationStyle;

/// What the browser's action button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionButtonType {
    /// Not editing; tapping enters edit mode.
    #[default]
    Edit,
    /// Editing; tapping leaves edit mode.
    Done,
}

impl ActionButtonType {
    pub fn for_editing(is_editing: bool) -> Self {
        if is_editing {
            Self::Done
        } else {
            Self::Edit
        }
    }
}

/// Browser state.
///
/// `is_editing` is the only state the browser decides on itself; the rest
/// mirrors what the host and the store last reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StickerBrowserState {
    pub is_editing: bool,
    pub presentation_style: PresentationStyle,
    /// Latest store query result, in store order.
    pub stickers: Vec<Sticker>,
}

impl UiState for StickerBrowserState {}

impl StickerBrowserState {
    pub fn action_button_type(&self) -> ActionButtonType {
        ActionButtonType::for_editing(self.is_editing)
    }

    pub fn navigation_bar_hidden(&self) -> bool {
        !self.presentation_style.is_expanded()
    }
}
