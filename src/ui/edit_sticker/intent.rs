//! Intents for the edit-sticker screen.

use crate::error::StoreError;
use crate::geometry::Rect;
use crate::media::StickerImage;
use crate::model::Sticker;
use crate::ui::mvi::Intent;

/// Events fired by the edit screen or by background work it started.
#[derive(Debug)]
pub enum EditStickerIntent {
    /// The edit session began. Carries what the loaded sticker already has.
    SessionStarted {
        has_image: bool,
        crop_is_empty: bool,
        is_persisted: bool,
    },

    SaveTapped,
    CancelTapped,
    DeleteTapped,
    PhotosTapped,

    /// Picker returned. `None` means the user cancelled; it is dropped.
    ImagePicked(Option<StickerImage>),

    /// Zoom/pan produced a new visible rectangle.
    CropChanged(Rect),

    /// Render queue finished. `None` is a soft failure.
    RenderFinished(Option<StickerImage>),

    /// Sticker store finished persisting.
    Persisted(Result<Sticker, StoreError>),

    /// Sticker store finished deleting.
    Deleted(Result<(), StoreError>),
}

impl Intent for EditStickerIntent {}
