//! Screens and the Model-View-Intent primitives they share.

pub mod edit_sticker;
pub mod mvi;
mod presentation;
pub mod sticker_browser;

pub use presentation::PresentationStyle;
