use crate::model::Sticker;

/// Navigation event emitted by a screen.
///
/// Consumed once by the coordinator and never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Show the browser as the root screen.
    StickerBrowserIsRequired,
    /// The "add sticker" entry was picked.
    AddStickerIsPicked,
    /// A persisted sticker was picked.
    StickerIsPicked(Sticker),
}
