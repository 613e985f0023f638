//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents are discrete occurrences, never polled values:
/// - User actions (tap, pick, zoom, select)
/// - Completions of background work (render finished, sticker stored)
pub trait Intent: std::fmt::Debug + Send + 'static {}
