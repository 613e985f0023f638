//! Blob storage for sticker images, keyed by sticker identity.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::media::StickerImage;
use crate::model::StickerId;

/// Which image of a sticker a blob holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// The photo the user picked.
    Original,
    /// The transparent sticker produced by the render service.
    Rendered,
}

impl ImageKind {
    fn file_suffix(self) -> &'static str {
        match self {
            ImageKind::Original => "original.png",
            ImageKind::Rendered => "sticker.png",
        }
    }
}

/// Image blob store.
///
/// Calls are cheap enough to run on the UI side. Fetch failures are
/// reported as "no image".
pub trait ImageStoreService: Send + Sync {
    fn store(&self, image: &StickerImage, id: StickerId, kind: ImageKind) -> Result<(), StoreError>;

    fn fetch(&self, id: StickerId, kind: ImageKind) -> Option<StickerImage>;

    /// Remove every blob stored for `id`. Missing blobs are not an error.
    fn remove(&self, id: StickerId) -> Result<(), StoreError>;
}

/// In-memory image store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryImageStore {
    images: RwLock<HashMap<(StickerId, ImageKind), StickerImage>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }
}

impl ImageStoreService for MemoryImageStore {
    fn store(&self, image: &StickerImage, id: StickerId, kind: ImageKind) -> Result<(), StoreError> {
        self.images.write().insert((id, kind), image.clone());
        Ok(())
    }

    fn fetch(&self, id: StickerId, kind: ImageKind) -> Option<StickerImage> {
        self.images.read().get(&(id, kind)).cloned()
    }

    fn remove(&self, id: StickerId) -> Result<(), StoreError> {
        self.images.write().retain(|(key, _), _| *key != id);
        Ok(())
    }
}

/// PNG files in a directory: `<id>.original.png` and `<id>.sticker.png`.
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    /// Open (and create if needed) the image directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, &e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: StickerId, kind: ImageKind) -> PathBuf {
        self.dir.join(format!("{}.{}", id, kind.file_suffix()))
    }
}

impl ImageStoreService for FsImageStore {
    fn store(&self, image: &StickerImage, id: StickerId, kind: ImageKind) -> Result<(), StoreError> {
        let bytes = image.encode_png().map_err(|e| StoreError::Encode {
            id,
            message: e.to_string(),
        })?;
        let path = self.path_for(id, kind);
        // Write to a sibling temp file first so readers never see half a PNG.
        let tmp = path.with_extension("png.tmp");
        fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, &e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, &e))?;
        tracing::debug!(sticker_id = %id, kind = ?kind, path = %path.display(), "Stored image");
        Ok(())
    }

    fn fetch(&self, id: StickerId, kind: ImageKind) -> Option<StickerImage> {
        let path = self.path_for(id, kind);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(sticker_id = %id, error = %err, "Failed to read image");
                return None;
            }
        };
        match StickerImage::decode(&bytes) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::warn!(sticker_id = %id, error = %err, "Failed to decode image");
                None
            }
        }
    }

    fn remove(&self, id: StickerId) -> Result<(), StoreError> {
        for kind in [ImageKind::Original, ImageKind::Rendered] {
            let path = self.path_for(id, kind);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(StoreError::io(&path, &err)),
            }
        }
        Ok(())
    }
}
