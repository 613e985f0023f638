//! Error types shared across services and startup.

use thiserror::Error;

use crate::config::ConfigError;
use crate::model::StickerId;

/// Failures reported by the sticker store and image store.
///
/// Carries messages rather than sources so it can be cloned into live
/// query channels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to decode image for sticker {id}: {message}")]
    Decode { id: StickerId, message: String },

    #[error("Failed to encode image for sticker {id}: {message}")]
    Encode { id: StickerId, message: String },

    #[error("Failed to serialize sticker index: {0}")]
    Serialize(String),

    #[error("Failed to lock sticker index '{path}': {message}")]
    Lock { path: String, message: String },

    #[error("Sticker {0} not found")]
    NotFound(StickerId),

    #[error("Sticker {0} has no original image")]
    MissingImage(StickerId),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Failures handing a sticker to the host conversation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsertError {
    #[error("Sticker {0} has no rendered image")]
    NoRenderedImage(StickerId),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Unrecoverable problems while bringing the application up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Host presentation context not available")]
    HostContextUnavailable,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}
