use serde::{Deserialize, Serialize};

/// Client-space rectangle, in CSS pixels relative to the viewport.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// Zero width and zero height: the geometry read did not produce anything usable.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Smallest rect covering every fragment. Empty input yields a degenerate rect.
    pub fn union_of(rects: &[Rect]) -> Rect {
        let mut iter = rects.iter();
        let Some(first) = iter.next() else {
            return Rect::default();
        };
        let (mut left, mut top, mut right, mut bottom) =
            (first.left, first.top, first.right, first.bottom);
        for r in iter {
            left = left.min(r.left);
            top = top.min(r.top);
            right = right.max(r.right);
            bottom = bottom.max(r.bottom);
        }
        Rect::new(left, top, right - left, bottom - top)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }

    /// True when the rect lies entirely above or entirely below the visible area.
    pub fn is_out_of_view(&self, rect: &Rect) -> bool {
        rect.bottom < 0.0 || rect.top > self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}
