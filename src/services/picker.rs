//! Image picker collaborator.

use std::path::PathBuf;

use crate::media::StickerImage;

/// Where the picker should take the image from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    PhotoLibrary,
    Camera,
}

/// Presents a picker and returns the chosen image, or `None` when the user
/// cancelled.
pub trait ImagePicker: Send + Sync {
    fn pick(&self, source: ImageSource) -> Option<StickerImage>;
}

/// Picker that "chooses" a file given up front, as a command line host does.
pub struct FileImagePicker {
    path: Option<PathBuf>,
}

impl FileImagePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ImagePicker for FileImagePicker {
    fn pick(&self, source: ImageSource) -> Option<StickerImage> {
        let path = self.path.as_ref()?;
        match StickerImage::open(path) {
            Ok(image) => {
                tracing::debug!(
                    path = %path.display(),
                    source = ?source,
                    width = image.width(),
                    height = image.height(),
                    "Picked image"
                );
                Some(image)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to open picked image");
                None
            }
        }
    }
}
