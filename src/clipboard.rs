//! Clipboard access for handing rendered stickers to other applications.

use std::borrow::Cow;

use arboard::{Clipboard, ImageData};

use crate::media::StickerImage;

/// Handler for clipboard operations.
pub struct ClipboardHandler {
    clipboard: Clipboard,
}

impl ClipboardHandler {
    /// Create a new clipboard handler.
    pub fn new() -> Result<Self, arboard::Error> {
        let clipboard = Clipboard::new()?;
        Ok(Self { clipboard })
    }

    /// Put a sticker on the system clipboard as an RGBA image.
    pub fn set_image(&mut self, image: &StickerImage) -> Result<(), String> {
        let data = ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.pixels().as_raw().as_slice()),
        };
        self.clipboard
            .set_image(data)
            .map_err(|e| format!("Failed to set clipboard image: {}", e))
    }
}
