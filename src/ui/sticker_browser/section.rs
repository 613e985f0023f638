use std::sync::Arc;

use tokio::sync::watch;

use crate::model::Sticker;
use crate::services::{ImageStoreService, ThumbnailCache};

use super::cell::BrowserCellViewModel;

/// One entry of the browser list.
#[derive(Debug, Clone)]
pub enum StickerSectionItem {
    /// A persisted sticker.
    Sticker(BrowserCellViewModel),
    /// The "add new sticker" entry; always last.
    AddSticker,
}

impl StickerSectionItem {
    pub fn sticker(&self) -> Option<&Sticker> {
        match self {
            Self::Sticker(cell) => Some(cell.sticker()),
            Self::AddSticker => None,
        }
    }

    pub fn is_add_sticker(&self) -> bool {
        matches!(self, Self::AddSticker)
    }
}

/// Build the full list: one cell per sticker in order, then the add entry.
pub(crate) fn section_items(
    stickers: &[Sticker],
    is_editing: &watch::Receiver<bool>,
    images: &Arc<dyn ImageStoreService>,
    thumbnails: &Arc<ThumbnailCache>,
) -> Vec<StickerSectionItem> {
    stickers
        .iter()
        .map(|sticker| {
            StickerSectionItem::Sticker(BrowserCellViewModel::new(
                sticker.clone(),
                is_editing.clone(),
                images.clone(),
                thumbnails.clone(),
            ))
        })
        .chain(std::iter::once(StickerSectionItem::AddSticker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Property;
    use crate::services::MemoryImageStore;

    fn build(stickers: &[Sticker]) -> Vec<StickerSectionItem> {
        let editing = Property::new(false);
        let images: Arc<dyn ImageStoreService> = Arc::new(MemoryImageStore::new());
        section_items(
            stickers,
            &editing.subscribe(),
            &images,
            &Arc::new(ThumbnailCache::new(8, 4)),
        )
    }

    #[test]
    fn empty_store_yields_only_add_entry() {
        let items = build(&[]);
        assert_eq!(items.len(), 1);
        assert!(items[0].is_add_sticker());
    }

    #[test]
    fn stickers_keep_order_and_add_entry_is_last() {
        let stickers = vec![Sticker::new(), Sticker::new(), Sticker::new()];
        let items = build(&stickers);
        assert_eq!(items.len(), 4);
        for (item, sticker) in items.iter().zip(&stickers) {
            assert_eq!(item.sticker().map(|s| s.id), Some(sticker.id));
        }
        assert!(items[3].is_add_sticker());
        assert_eq!(items.iter().filter(|i| i.is_add_sticker()).count(), 1);
    }
}
