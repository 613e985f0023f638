//! External collaborators consumed by the view-models, with local
//! implementations.
//!
//! - `image_store` - image blobs keyed by sticker identity
//! - `sticker_store` - sticker records with live predicate queries
//! - `render` / `render_queue` - background sticker rendering
//! - `thumbnails` - shared thumbnail cache for browser cells
//! - `picker` - image picker

mod image_store;
mod picker;
mod render;
mod render_queue;
mod sticker_store;
mod thumbnails;

pub use image_store::{FsImageStore, ImageKind, ImageStoreService, MemoryImageStore};
pub use picker::{FileImagePicker, ImagePicker, ImageSource};
pub use render::{thumbnail, CropRenderer, StickerRenderService};
pub use render_queue::RenderQueue;
pub use sticker_store::{LocalStickerStore, QueryResult, StickerQuery, StickerStoreService};
pub use thumbnails::ThumbnailCache;
