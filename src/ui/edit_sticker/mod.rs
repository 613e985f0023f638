//! Edit-sticker screen.
//!
//! Picks a photo, tracks the crop rectangle and runs the save chain:
//! render on the background queue, persist through the sticker store,
//! then dismiss.
//!
//! # Architecture
//!
//! - `state.rs` - Screen flags and the save/delete activity
//! - `intent.rs` - UI events and background completions
//! - `reducer.rs` - State transitions (pure, no side effects)
//! - `view_model.rs` - Binds payloads, runs the reducer, starts work
//! - `output.rs` - Signals for the presentation layer

mod intent;
mod output;
mod reducer;
mod state;
mod view_model;

pub use intent::EditStickerIntent;
pub use output::EditStickerOutput;
pub use reducer::EditStickerReducer;
pub use state::{Activity, DismissReason, EditStickerState};
pub use view_model::EditStickerViewModel;
