//! Annotation data structures.

use serde::{Deserialize, Serialize};

use crate::constants::NO_LABEL;
use crate::geometry::{Point, Rect};

/// Unique identifier for an annotation within a project.
pub type AnnotationId = u64;

/// A single labeled region on one photo.
///
/// Coordinates are in photo space, not UI-scaled space. Two annotations with
/// the same geometry and label are still distinct entities: identity is the
/// `id`, which never changes for the lifetime of the annotation (including
/// when it is removed and later restored by undo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable identifier.
    pub id: AnnotationId,
    /// Text label, `"No Label"` until the user assigns one.
    #[serde(default = "default_label")]
    pub label: String,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "width")]
    pub w: f32,
    #[serde(rename = "height")]
    pub h: f32,
}

fn default_label() -> String {
    NO_LABEL.to_string()
}

impl Annotation {
    /// Create an unlabeled annotation covering `rect`.
    pub fn new(id: AnnotationId, rect: Rect) -> Self {
        Self {
            id,
            label: default_label(),
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        }
    }

    /// Builder-style label assignment.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    /// Whether the label counts towards the detected label index.
    pub fn has_meaningful_label(&self) -> bool {
        !self.label.is_empty() && self.label != NO_LABEL
    }
}
