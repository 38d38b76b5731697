//! Geometry primitives for the annotation editor.
//!
//! All coordinates are in the photo's local space with the origin at the
//! top-left corner and Y growing downward. Rectangles may carry a negative
//! width or height while a box is being dragged out; [`Rect::standardized`]
//! folds them back into a canonical form.

use serde::{Deserialize, Serialize};

use crate::constants::scale;

// ============================================================================
// Points and Sizes
// ============================================================================

/// A 2D point in photo coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    pub fn delta_to(&self, other: Point) -> (f32, f32) {
        (self.x - other.x, self.y - other.y)
    }
}

/// Width/height pair, used for photo pixel and display sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Per-photo UI scale factor.
///
/// Handle sizes, line thickness, label font size and the minimum creatable
/// area all scale linearly with this value so that the affordances keep the
/// same apparent size regardless of the photo's resolution.
pub fn ui_scale(display: Size) -> f32 {
    (display.width + display.height) / scale::DIVISOR
}

// ============================================================================
// Corners
// ============================================================================

/// One of the four resize handles of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Fixed enumeration order used for handle hit-testing priority.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Index of this corner in [`Corner::ALL`].
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }
}

// ============================================================================
// Rectangles
// ============================================================================

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Origin X coordinate
    pub x: f32,
    /// Origin Y coordinate
    pub y: f32,
    /// Width (negative while a creation drag goes leftwards)
    pub w: f32,
    /// Height (negative while a creation drag goes upwards)
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle spanning two arbitrary corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x - a.x, b.y - a.y).standardized()
    }

    /// Normalize negative extents so the origin is the minimum corner.
    pub fn standardized(&self) -> Self {
        let (x, w) = if self.w < 0.0 {
            (self.x + self.w, -self.w)
        } else {
            (self.x, self.w)
        };
        let (y, h) = if self.h < 0.0 {
            (self.y + self.h, -self.h)
        } else {
            (self.y, self.h)
        };
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Signed area; its magnitude is what the creation threshold compares.
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Half-open containment test on the standardized rectangle.
    pub fn contains(&self, point: Point) -> bool {
        let r = self.standardized();
        point.x >= r.x && point.x < r.x + r.w && point.y >= r.y && point.y < r.y + r.h
    }

    /// Position of one corner of the standardized rectangle.
    pub fn corner(&self, corner: Corner) -> Point {
        let r = self.standardized();
        match corner {
            Corner::TopLeft => Point::new(r.x, r.y),
            Corner::TopRight => Point::new(r.x + r.w, r.y),
            Corner::BottomLeft => Point::new(r.x, r.y + r.h),
            Corner::BottomRight => Point::new(r.x + r.w, r.y + r.h),
        }
    }

    /// Hit boxes for the four corner handles, in [`Corner::ALL`] order.
    ///
    /// Each handle is a square of `HANDLE_SIZE * scale` centred on its corner.
    pub fn corner_handles(&self, scale: f32) -> [Rect; 4] {
        self.corner_handles_sized(scale::HANDLE_SIZE * scale)
    }

    /// Like [`Rect::corner_handles`] with an explicit, already-scaled side.
    pub fn corner_handles_sized(&self, side: f32) -> [Rect; 4] {
        let half = side / 2.0;
        Corner::ALL.map(|corner| {
            let p = self.corner(corner);
            Rect::new(p.x - half, p.y - half, side, side)
        })
    }

    /// First corner (in [`Corner::ALL`] order) whose handle contains `point`.
    pub fn handle_at(&self, point: Point, side: f32) -> Option<Corner> {
        let handles = self.corner_handles_sized(side);
        Corner::ALL
            .into_iter()
            .zip(handles)
            .find(|(_, handle)| handle.contains(point))
            .map(|(corner, _)| corner)
    }
}
