//! TOML configuration: storage location, render size, browser thumbnails
//! and the sticker pick policy.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{BrowserConfig, Config, FlowConfig, RenderConfig, StickerPickPolicy, StorageConfig};
