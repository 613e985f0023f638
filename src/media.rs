//! Shared image buffers.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::geometry::{Rect, Size};

/// An RGBA image shared between the UI side and background work.
///
/// Cloning is cheap: the pixel buffer sits behind an `Arc`.
#[derive(Clone)]
pub struct StickerImage {
    pixels: Arc<RgbaImage>,
}

impl StickerImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Fully transparent image of the given pixel size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(RgbaImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }

    /// The image extent as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f64, self.height() as f64)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Decode any supported format (PNG, JPEG) from memory.
    pub fn decode(bytes: &[u8]) -> image::ImageResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    pub fn open(path: &Path) -> image::ImageResult<Self> {
        let decoded = image::open(path)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    /// Encode as PNG, keeping the alpha channel.
    pub fn encode_png(&self) -> image::ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(self.pixels.as_ref().clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

impl PartialEq for StickerImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels) || *self.pixels == *other.pixels
    }
}

impl std::fmt::Debug for StickerImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickerImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
