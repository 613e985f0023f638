//! Sticker browser screen.
//!
//! Lists every sticker with a rendered image, followed by an "add sticker"
//! entry. An action button toggles edit mode, which shows delete badges on
//! the cells and asks the host to expand.
//!
//! # Architecture
//!
//! - `state.rs` - Editing flag, presentation style, latest stickers
//! - `intent.rs` - Taps, selections, style changes, store results
//! - `reducer.rs` - State transitions (pure, no side effects)
//! - `section.rs` / `cell.rs` - Display list and per-sticker cells
//! - `view_model.rs` - Observes the store, emits outputs and steps

mod cell;
mod intent;
mod output;
mod reducer;
mod section;
mod state;
mod view_model;

pub use cell::BrowserCellViewModel;
pub use intent::StickerBrowserIntent;
pub use output::StickerBrowserOutput;
pub use reducer::StickerBrowserReducer;
pub use section::StickerSectionItem;
pub use state::{ActionButtonType, StickerBrowserState};
pub use view_model::StickerBrowserViewModel;
