//! Sticker records and edit-session state.

mod sticker;
mod sticker_info;

pub use sticker::{Sticker, StickerId, StickerPredicate, StickerProperty};
pub use sticker_info::{StickerInfo, StickerInfoSnapshot};
