//! Turning a picked photo plus crop bounds into a transparent sticker.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::geometry::Rect;
use crate::media::StickerImage;
use crate::model::StickerInfoSnapshot;

/// Sticker render service.
///
/// Returning `None` is a soft failure (nothing to render, empty crop) and
/// never panics. Implementations are CPU-bound and are only called from the
/// render queue's background thread.
pub trait StickerRenderService: Send + Sync {
    fn render(&self, info: &StickerInfoSnapshot) -> Option<StickerImage>;
}

/// Crops the original image to the crop bounds on a transparent canvas and
/// scales the result down to fit `max_dimension`.
///
/// Parts of the crop that fall outside the photo stay transparent.
pub struct CropRenderer {
    max_dimension: u32,
}

impl CropRenderer {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }
}

impl StickerRenderService for CropRenderer {
    fn render(&self, info: &StickerInfoSnapshot) -> Option<StickerImage> {
        let original = info.original_image.as_ref()?;
        let crop = info.crop_bounds;
        if crop.is_empty() {
            return None;
        }
        let visible = original.bounds().intersection(&crop)?;

        let region = to_pixel_rect(&visible);
        let (x, y, width, height) = region;
        if width == 0 || height == 0 {
            return None;
        }

        // Scale before allocating so the canvas never exceeds max_dimension,
        // however large the crop is.
        let scale = (self.max_dimension as f64 / crop.width.max(crop.height)).min(1.0);
        let canvas_width = scaled(crop.width, scale);
        let canvas_height = scaled(crop.height, scale);
        let mut canvas = RgbaImage::new(canvas_width, canvas_height);

        let piece = imageops::crop_imm(original.pixels(), x, y, width, height).to_image();
        let piece = if scale < 1.0 {
            imageops::resize(
                &piece,
                scaled(width as f64, scale),
                scaled(height as f64, scale),
                FilterType::Lanczos3,
            )
        } else {
            piece
        };
        let offset_x = ((visible.x - crop.x) * scale).round() as i64;
        let offset_y = ((visible.y - crop.y) * scale).round() as i64;
        imageops::overlay(&mut canvas, &piece, offset_x, offset_y);

        tracing::debug!(
            sticker_id = %info.id,
            width = canvas.width(),
            height = canvas.height(),
            "Rendered sticker"
        );
        Some(StickerImage::new(canvas))
    }
}

fn to_pixel_rect(rect: &Rect) -> (u32, u32, u32, u32) {
    let x = rect.x.floor().max(0.0) as u32;
    let y = rect.y.floor().max(0.0) as u32;
    let width = rect.width.round().max(0.0) as u32;
    let height = rect.height.round().max(0.0) as u32;
    (x, y, width, height)
}

fn scaled(length: f64, scale: f64) -> u32 {
    (length * scale).round().max(1.0) as u32
}

/// Downscaled copy for browser cells.
pub fn thumbnail(image: &StickerImage, side: u32) -> StickerImage {
    let side = side.max(1);
    if image.width() <= side && image.height() <= side {
        return image.clone();
    }
    let scale = side as f64 / image.width().max(image.height()) as f64;
    let width = ((image.width() as f64 * scale).round() as u32).max(1);
    let height = ((image.height() as f64 * scale).round() as u32).max(1);
    StickerImage::new(imageops::thumbnail(image.pixels(), width, height))
}
