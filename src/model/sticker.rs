use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Rect;

/// Stable identity of a sticker, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerId(Uuid);

impl StickerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StickerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StickerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StickerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Persisted sticker record as kept by the sticker store.
///
/// Image blobs live in the image store, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub id: StickerId,
    /// Set once a render has been persisted for this sticker.
    pub has_rendered_image: bool,
    /// Crop used for the last render, so editing can resume from it.
    #[serde(default)]
    pub crop_bounds: Rect,
    /// Bumped by the store on every write.
    #[serde(default)]
    pub revision: u64,
}

impl Sticker {
    /// A sticker that has not been stored yet.
    pub fn new() -> Self {
        Self {
            id: StickerId::new(),
            has_rendered_image: false,
            crop_bounds: Rect::ZERO,
            revision: 0,
        }
    }
}

impl Default for Sticker {
    fn default() -> Self {
        Self::new()
    }
}

/// Queryable sticker fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickerProperty {
    HasRenderedImage,
}

/// Declarative filter for sticker store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickerPredicate {
    All,
    Equals {
        property: StickerProperty,
        value: bool,
    },
}

impl StickerPredicate {
    /// `hasRenderedImage == true`: stickers that are ready to browse.
    pub fn has_rendered_image() -> Self {
        StickerPredicate::Equals {
            property: StickerProperty::HasRenderedImage,
            value: true,
        }
    }

    pub fn matches(&self, sticker: &Sticker) -> bool {
        match self {
            StickerPredicate::All => true,
            StickerPredicate::Equals { property, value } => match property {
                StickerProperty::HasRenderedImage => sticker.has_rendered_image == *value,
            },
        }
    }
}
