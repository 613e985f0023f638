//! Reducer for the sticker browser.

use crate::ui::mvi::Reducer;

use super::intent::StickerBrowserIntent;
use super::state::StickerBrowserState;

pub struct StickerBrowserReducer;

impl Reducer for StickerBrowserReducer {
    type State = StickerBrowserState;
    type Intent = StickerBrowserIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            // Every tap flips the mode, whatever the button showed.
            StickerBrowserIntent::ActionButtonTapped(_) => StickerBrowserState {
                is_editing: !state.is_editing,
                ..state
            },

            StickerBrowserIntent::PresentationStyleChanged(style) => StickerBrowserState {
                presentation_style: style,
                ..state
            },

            // Selection only has side effects.
            StickerBrowserIntent::ItemSelected(_) => state,

            StickerBrowserIntent::StickersChanged(Ok(stickers)) => {
                StickerBrowserState { stickers, ..state }
            }

            // A failed query shows an empty list instead of ending the stream.
            StickerBrowserIntent::StickersChanged(Err(_)) => StickerBrowserState {
                stickers: Vec::new(),
                ..state
            },
        }
    }
}
