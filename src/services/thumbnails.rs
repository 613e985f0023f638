//! Shared thumbnail cache for browser cells.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use crate::media::StickerImage;
use crate::model::{Sticker, StickerId};
use crate::services::image_store::{ImageKind, ImageStoreService};
use crate::services::render::thumbnail;

type CacheKey = (StickerId, u64);

struct CacheInner {
    entries: HashMap<CacheKey, StickerImage>,
    order: VecDeque<CacheKey>,
}

/// Least-recently-used cache of downscaled rendered stickers.
///
/// Keyed by identity and revision, so a re-saved sticker never shows its
/// old thumbnail.
pub struct ThumbnailCache {
    side: u32,
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl ThumbnailCache {
    pub fn new(side: u32, capacity: usize) -> Self {
        Self {
            side,
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached thumbnail for `sticker`, loading it from `images` on a miss.
    /// A missing blob is not cached so a later fetch can succeed.
    pub fn get_or_load(
        &self,
        sticker: &Sticker,
        images: &dyn ImageStoreService,
    ) -> Option<StickerImage> {
        let key = (sticker.id, sticker.revision);
        if let Some(hit) = self.touch(&key) {
            return Some(hit);
        }

        let rendered = images.fetch(sticker.id, ImageKind::Rendered)?;
        let thumb = thumbnail(&rendered, self.side);

        let mut inner = self.inner.lock();
        // Older revisions of this sticker are dead weight now.
        inner
            .entries
            .retain(|(id, revision), _| *id != sticker.id || *revision == sticker.revision);
        inner
            .order
            .retain(|(id, revision)| *id != sticker.id || *revision == sticker.revision);
        inner.entries.insert(key, thumb.clone());
        inner.order.push_back(key);
        while inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.entries.remove(&evicted);
            }
        }
        Some(thumb)
    }

    fn touch(&self, key: &CacheKey) -> Option<StickerImage> {
        let mut inner = self.inner.lock();
        let hit = inner.entries.get(key).cloned()?;
        if let Some(position) = inner.order.iter().position(|k| k == key) {
            inner.order.remove(position);
        }
        inner.order.push_back(*key);
        Some(hit)
    }
}
