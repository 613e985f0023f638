//! State for the edit-sticker screen.

use crate::ui::mvi::UiState;

/// Why the edit screen asks to be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Cancelled,
    Saved,
    Deleted,
}

/// What the save/delete pipeline is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    /// Waiting for input.
    #[default]
    Idle,
    /// Render job queued or running on the background thread.
    Rendering,
    /// Rendered sticker landed; the store is persisting it.
    Persisting,
    /// The store is deleting the sticker.
    Deleting,
    /// Session over; every later intent is ignored.
    Finished(DismissReason),
}

impl Activity {
    /// Save/delete chain outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Rendering | Self::Persisting | Self::Deleting)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// Edit screen state.
///
/// Image and crop data live in `StickerInfo`; this only tracks what the
/// screen decides on.
#[derive(Debug, Clone, PartialEq)]
pub struct EditStickerState {
    pub has_image: bool,
    pub crop_is_empty: bool,
    /// `has_image && !crop_is_empty`.
    pub save_enabled: bool,
    /// The automatic picker prompt for an image-less session was handled.
    pub picker_prompted: bool,
    /// Number of picker presentations requested so far.
    pub picker_requests: u64,
    /// The sticker exists in the store (delete has something to remove).
    pub is_persisted: bool,
    pub activity: Activity,
}

impl Default for EditStickerState {
    fn default() -> Self {
        Self {
            has_image: false,
            crop_is_empty: true,
            save_enabled: false,
            picker_prompted: false,
            picker_requests: 0,
            is_persisted: false,
            activity: Activity::Idle,
        }
    }
}

impl UiState for EditStickerState {}

impl EditStickerState {
    pub fn can_save(&self) -> bool {
        self.save_enabled && self.activity == Activity::Idle
    }
}
