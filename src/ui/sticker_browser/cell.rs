use std::sync::Arc;

use tokio::sync::watch;

use crate::media::StickerImage;
use crate::model::Sticker;
use crate::services::{ImageStoreService, ThumbnailCache};

/// One browser cell: a persisted sticker plus the browser's editing flag.
///
/// Holds no state of its own. The thumbnail is loaded on first request and
/// kept in the shared thumbnail cache.
#[derive(Clone)]
pub struct BrowserCellViewModel {
    sticker: Sticker,
    is_editing: watch::Receiver<bool>,
    images: Arc<dyn ImageStoreService>,
    thumbnails: Arc<ThumbnailCache>,
}

impl BrowserCellViewModel {
    pub fn new(
        sticker: Sticker,
        is_editing: watch::Receiver<bool>,
        images: Arc<dyn ImageStoreService>,
        thumbnails: Arc<ThumbnailCache>,
    ) -> Self {
        Self {
            sticker,
            is_editing,
            images,
            thumbnails,
        }
    }

    pub fn sticker(&self) -> &Sticker {
        &self.sticker
    }

    pub fn thumbnail(&self) -> Option<StickerImage> {
        self.thumbnails.get_or_load(&self.sticker, self.images.as_ref())
    }

    /// Delete badge visibility; follows the browser's editing flag.
    pub fn shows_delete_badge(&self) -> bool {
        *self.is_editing.borrow()
    }

    /// Observe the editing flag.
    pub fn subscribe_delete_badge(&self) -> watch::Receiver<bool> {
        self.is_editing.clone()
    }
}

impl std::fmt::Debug for BrowserCellViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserCellViewModel")
            .field("sticker", &self.sticker.id)
            .field("shows_delete_badge", &self.shows_delete_badge())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Property;
    use crate::services::{ImageKind, MemoryImageStore};

    #[test]
    fn badge_follows_editing_flag() {
        let editing = Property::new(false);
        let cell = BrowserCellViewModel::new(
            Sticker::new(),
            editing.subscribe(),
            Arc::new(MemoryImageStore::new()),
            Arc::new(ThumbnailCache::new(8, 4)),
        );
        assert!(!cell.shows_delete_badge());
        let mut badge = cell.subscribe_delete_badge();
        editing.set(true);
        assert!(cell.shows_delete_badge());
        assert!(badge.has_changed().unwrap());
        assert!(*badge.borrow_and_update());
    }

    #[test]
    fn thumbnail_is_loaded_once_into_cache() {
        let images = Arc::new(MemoryImageStore::new());
        let thumbnails = Arc::new(ThumbnailCache::new(8, 4));
        let mut sticker = Sticker::new();
        sticker.has_rendered_image = true;
        images
            .store(&StickerImage::transparent(32, 16), sticker.id, ImageKind::Rendered)
            .unwrap();

        let editing = Property::new(false);
        let cell = BrowserCellViewModel::new(
            sticker,
            editing.subscribe(),
            images,
            thumbnails.clone(),
        );
        let thumb = cell.thumbnail().expect("thumbnail");
        assert_eq!((thumb.width(), thumb.height()), (8, 4));
        assert_eq!(thumbnails.len(), 1);
        assert!(cell.thumbnail().is_some());
        assert_eq!(thumbnails.len(), 1);
    }
}
