use crate::geometry::Rect;
use crate::media::StickerImage;
use crate::services::ImageSource;

use super::state::DismissReason;

/// Signals the edit screen renders from.
#[derive(Debug, Clone, PartialEq)]
pub enum EditStickerOutput {
    /// The image to show, paired with the crop rectangle current at the time
    /// the image changed.
    OriginalImageWithBounds { image: StickerImage, bounds: Rect },
    /// Save button state. Only sent when the value changes.
    SaveEnabled(bool),
    /// Show the image picker.
    PresentImagePicker(ImageSource),
    /// Close the edit screen.
    Dismiss(DismissReason),
}
