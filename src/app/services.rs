use std::sync::Arc;

use crate::config::Config;
use crate::error::StoreError;
use crate::services::{
    CropRenderer, FsImageStore, ImageStoreService, LocalStickerStore, MemoryImageStore,
    RenderQueue, StickerRenderService, StickerStoreService, ThumbnailCache,
};

/// Collaborators shared by every view-model of a session.
#[derive(Clone)]
pub struct AppServices {
    pub sticker_store: Arc<dyn StickerStoreService>,
    pub image_store: Arc<dyn ImageStoreService>,
    pub render_queue: RenderQueue,
    pub thumbnails: Arc<ThumbnailCache>,
}

impl AppServices {
    pub fn new(
        sticker_store: Arc<dyn StickerStoreService>,
        image_store: Arc<dyn ImageStoreService>,
        renderer: Arc<dyn StickerRenderService>,
        thumbnails: Arc<ThumbnailCache>,
    ) -> Self {
        Self {
            sticker_store,
            image_store,
            render_queue: RenderQueue::new(renderer),
            thumbnails,
        }
    }

    /// Stores under `config.storage.data_dir`.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let image_store: Arc<dyn ImageStoreService> =
            Arc::new(FsImageStore::open(config.storage.images_dir())?);
        let sticker_store = Arc::new(LocalStickerStore::open(
            &config.storage.data_dir,
            image_store.clone(),
        )?);
        tracing::info!(data_dir = %config.storage.data_dir.display(), "Opened sticker storage");
        Ok(Self::with_config(sticker_store, image_store, config))
    }

    /// Stores that live only as long as the process.
    pub fn in_memory(config: &Config) -> Self {
        let image_store: Arc<dyn ImageStoreService> = Arc::new(MemoryImageStore::new());
        let sticker_store = Arc::new(LocalStickerStore::in_memory(image_store.clone()));
        Self::with_config(sticker_store, image_store, config)
    }

    fn with_config(
        sticker_store: Arc<dyn StickerStoreService>,
        image_store: Arc<dyn ImageStoreService>,
        config: &Config,
    ) -> Self {
        Self::new(
            sticker_store,
            image_store,
            Arc::new(CropRenderer::new(config.render.max_dimension)),
            Arc::new(ThumbnailCache::new(
                config.browser.thumbnail_size,
                config.browser.thumbnail_cache_capacity,
            )),
        )
    }
}
