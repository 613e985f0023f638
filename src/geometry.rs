//! Plain geometry values used for crop bounds.
//!
//! Coordinates are in original-image pixel space with the origin at the
//! top-left corner.

use serde::{Deserialize, Serialize};

/// Width and height of an image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle is empty when it has no area (zero or negative extent,
    /// or a non-finite component).
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Overlapping region of two rectangles, or `None` when they do not
    /// overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        let rect = Rect::new(x, y, max_x - x, max_y - y);
        (!rect.is_empty()).then_some(rect)
    }

    /// Largest square centered in an image of the given size.
    pub fn centered_square(size: Size) -> Rect {
        let side = size.width.min(size.height).max(0.0);
        Rect::new(
            (size.width - side) / 2.0,
            (size.height - side) / 2.0,
            side,
            side,
        )
    }
}

impl std::str::FromStr for Rect {
    type Err = String;

    /// Parses `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!("expected x,y,width,height but got '{}'", s));
        }
        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{}': {}", part, e))?;
        }
        Ok(Rect::new(values[0], values[1], values[2], values[3]))
    }
}
