use tokio::sync::watch;

use crate::geometry::Rect;
use crate::media::StickerImage;
use crate::model::{Sticker, StickerId};
use crate::reactive::Property;
use crate::services::{ImageKind, ImageStoreService};

/// In-progress state of one sticker during an edit session.
///
/// Owned by a single edit view-model and only written from its dispatch
/// path. Background work receives a [`StickerInfoSnapshot`] instead.
#[derive(Debug)]
pub struct StickerInfo {
    id: StickerId,
    original_image: Property<Option<StickerImage>>,
    crop_bounds: Property<Rect>,
    rendered_sticker: Property<Option<StickerImage>>,
}

/// Value copy of a [`StickerInfo`], safe to move across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerInfoSnapshot {
    pub id: StickerId,
    pub original_image: Option<StickerImage>,
    pub crop_bounds: Rect,
    pub rendered_sticker: Option<StickerImage>,
}

impl StickerInfo {
    /// Fresh info with no image and empty crop bounds.
    pub fn new(id: StickerId) -> Self {
        Self {
            id,
            original_image: Property::new(None),
            crop_bounds: Property::new(Rect::ZERO),
            rendered_sticker: Property::new(None),
        }
    }

    /// Info for an existing sticker, with images loaded from the image
    /// store. Missing blobs leave the corresponding field empty.
    pub fn load(sticker: &Sticker, images: &dyn ImageStoreService) -> Self {
        let info = Self::new(sticker.id);
        info.original_image
            .set(images.fetch(sticker.id, ImageKind::Original));
        info.crop_bounds.set(sticker.crop_bounds);
        if sticker.has_rendered_image {
            info.rendered_sticker
                .set(images.fetch(sticker.id, ImageKind::Rendered));
        }
        info
    }

    pub fn id(&self) -> StickerId {
        self.id
    }

    pub fn original_image(&self) -> Option<StickerImage> {
        self.original_image.get()
    }

    pub fn set_original_image(&self, image: StickerImage) {
        self.original_image.set(Some(image));
    }

    pub fn original_image_is_none(&self) -> bool {
        self.original_image.borrow().is_none()
    }

    pub fn subscribe_original_image(&self) -> watch::Receiver<Option<StickerImage>> {
        self.original_image.subscribe()
    }

    pub fn crop_bounds(&self) -> Rect {
        self.crop_bounds.get()
    }

    pub fn set_crop_bounds(&self, bounds: Rect) {
        self.crop_bounds.set(bounds);
    }

    pub fn crop_bounds_are_empty(&self) -> bool {
        self.crop_bounds.borrow().is_empty()
    }

    pub fn subscribe_crop_bounds(&self) -> watch::Receiver<Rect> {
        self.crop_bounds.subscribe()
    }

    pub fn rendered_sticker(&self) -> Option<StickerImage> {
        self.rendered_sticker.get()
    }

    pub fn subscribe_rendered_sticker(&self) -> watch::Receiver<Option<StickerImage>> {
        self.rendered_sticker.subscribe()
    }

    /// Whether a render may run: an image is present and the crop has area.
    pub fn is_renderable(&self) -> bool {
        !self.original_image_is_none() && !self.crop_bounds_are_empty()
    }

    /// Store a finished render.
    ///
    /// Refused (returns `false`) unless the info is renderable, so a
    /// rendered sticker never exists without its source image and crop.
    pub fn set_rendered_sticker(&self, image: StickerImage) -> bool {
        if !self.is_renderable() {
            tracing::warn!(
                sticker_id = %self.id,
                "Rejected rendered sticker without image or crop bounds"
            );
            return false;
        }
        self.rendered_sticker.set(Some(image));
        true
    }

    pub fn snapshot(&self) -> StickerInfoSnapshot {
        StickerInfoSnapshot {
            id: self.id,
            original_image: self.original_image(),
            crop_bounds: self.crop_bounds(),
            rendered_sticker: self.rendered_sticker(),
        }
    }
}

impl StickerInfoSnapshot {
    /// The store record this snapshot persists to.
    pub fn to_sticker(&self, revision: u64) -> Sticker {
        Sticker {
            id: self.id,
            has_rendered_image: self.rendered_sticker.is_some(),
            crop_bounds: self.crop_bounds,
            revision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryImageStore;

    #[test]
    fn new_info_is_not_renderable() {
        let info = StickerInfo::new(StickerId::new());
        assert!(info.original_image_is_none());
        assert!(info.crop_bounds_are_empty());
        assert!(!info.is_renderable());
    }

    #[test]
    fn rendered_sticker_requires_image_and_crop() {
        let info = StickerInfo::new(StickerId::new());
        assert!(!info.set_rendered_sticker(StickerImage::transparent(1, 1)));
        assert!(info.rendered_sticker().is_none());

        info.set_original_image(StickerImage::transparent(400, 300));
        assert!(!info.set_rendered_sticker(StickerImage::transparent(1, 1)));

        info.set_crop_bounds(Rect::new(50.0, 50.0, 200.0, 150.0));
        assert!(info.set_rendered_sticker(StickerImage::transparent(1, 1)));
        assert!(info.rendered_sticker().is_some());
    }

    #[test]
    fn subscribers_see_each_field_change() {
        let info = StickerInfo::new(StickerId::new());
        let mut image = info.subscribe_original_image();
        let mut crop = info.subscribe_crop_bounds();
        let mut rendered = info.subscribe_rendered_sticker();

        info.set_original_image(StickerImage::transparent(6, 6));
        assert!(image.has_changed().unwrap());
        assert_eq!(image.borrow_and_update().as_ref().map(|i| i.width()), Some(6));
        assert!(!crop.has_changed().unwrap());

        info.set_crop_bounds(Rect::new(1.0, 1.0, 4.0, 4.0));
        assert_eq!(*crop.borrow_and_update(), Rect::new(1.0, 1.0, 4.0, 4.0));
        assert!(!rendered.has_changed().unwrap());

        assert!(info.set_rendered_sticker(StickerImage::transparent(2, 2)));
        assert!(rendered.has_changed().unwrap());
        assert!(rendered.borrow_and_update().is_some());
    }

    #[test]
    fn load_reads_blobs_for_existing_sticker() {
        let images = MemoryImageStore::new();
        let mut sticker = Sticker::new();
        sticker.has_rendered_image = true;
        sticker.crop_bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        images
            .store(&StickerImage::transparent(20, 20), sticker.id, ImageKind::Original)
            .unwrap();
        images
            .store(&StickerImage::transparent(10, 10), sticker.id, ImageKind::Rendered)
            .unwrap();

        let info = StickerInfo::load(&sticker, &images);
        assert_eq!(info.id(), sticker.id);
        assert_eq!(info.original_image().map(|i| i.width()), Some(20));
        assert_eq!(info.rendered_sticker().map(|i| i.width()), Some(10));
        assert_eq!(info.crop_bounds(), sticker.crop_bounds);
    }

    #[test]
    fn snapshot_maps_to_record() {
        let info = StickerInfo::new(StickerId::new());
        info.set_original_image(StickerImage::transparent(4, 4));
        info.set_crop_bounds(Rect::new(0.0, 0.0, 4.0, 4.0));
        info.set_rendered_sticker(StickerImage::transparent(4, 4));

        let record = info.snapshot().to_sticker(3);
        assert!(record.has_rendered_image);
        assert_eq!(record.revision, 3);
        assert_eq!(record.id, info.id());
    }
}
