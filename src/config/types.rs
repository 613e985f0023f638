use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub flow: FlowConfig,
}

/// Where stickers and their images are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `stickers.json` and the `images/` folder.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Sticker render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Rendered stickers are downscaled so neither side exceeds this (default: 618).
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

/// Sticker browser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Thumbnail edge length in pixels (default: 120).
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
    /// Number of thumbnails kept in memory (default: 64).
    #[serde(default = "default_thumbnail_cache_capacity")]
    pub thumbnail_cache_capacity: usize,
}

/// Navigation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// What picking an existing sticker in the browser does.
    #[serde(default)]
    pub sticker_pick: StickerPickPolicy,
}

/// Policy for a sticker picked in the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerPickPolicy {
    /// Open the sticker in the editor.
    #[default]
    Edit,
    /// Hand the sticker to the host for insertion into the conversation.
    Insert,
}

pub(crate) const MAX_RENDER_DIMENSION: u32 = 2048;

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("photo-stickers")
}

fn default_max_dimension() -> u32 {
    618
}

fn default_thumbnail_size() -> u32 {
    120
}

fn default_thumbnail_cache_capacity() -> usize {
    64
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: default_thumbnail_size(),
            thumbnail_cache_capacity: default_thumbnail_cache_capacity(),
        }
    }
}

impl StorageConfig {
    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }
}
