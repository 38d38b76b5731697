//! Imported photos and the annotations drawn on them.

use serde::{Deserialize, Serialize};

use super::annotation::{Annotation, AnnotationId};
use crate::geometry::{Point, Rect, Size};

/// Unique identifier for an imported photo within a project.
pub type PhotoId = u64;

/// One imported photo plus its annotations.
///
/// The image bytes live outside the project and are fetched through the
/// [`Document`](crate::document::Document) collaborator by `filename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAnnotation {
    /// Stable identifier.
    pub id: PhotoId,
    /// Name of the stored image file.
    pub filename: String,
    /// Annotations in drawing order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Real pixel dimensions, once known.
    #[serde(default)]
    pub real_size: Option<Size>,
    /// Dimensions the photo is displayed at.
    #[serde(default)]
    pub display_size: Option<Size>,
}

impl PhotoAnnotation {
    pub fn new(id: PhotoId, filename: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            annotations: Vec::new(),
            real_size: None,
            display_size: None,
        }
    }

    pub fn with_sizes(mut self, real: Size, display: Size) -> Self {
        self.real_size = Some(real);
        self.display_size = Some(display);
        self
    }

    /// Size used to derive the UI scale factor: display size if known,
    /// otherwise the real size.
    pub fn effective_display_size(&self) -> Option<Size> {
        self.display_size.or(self.real_size)
    }

    pub fn position_of(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.id == id)
    }

    /// Position of the first annotation whose geometry equals `rect` exactly.
    pub fn position_of_rect(&self, rect: Rect) -> Option<usize> {
        self.annotations.iter().position(|a| a.rect() == rect)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    /// Look up an annotation by id, falling back to a geometric match.
    ///
    /// Undo entries use this so that a step still lands when the annotation
    /// was replaced by an equal copy behind the editor's back.
    pub fn resolve_mut(&mut self, id: AnnotationId, expected: Rect) -> Option<&mut Annotation> {
        let index = self
            .position_of(id)
            .or_else(|| self.position_of_rect(expected))?;
        self.annotations.get_mut(index)
    }

    /// First annotation (in list order) containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.contains(point))
    }

    /// Insert at `position`, clamped to the end of the list.
    pub fn insert_at(&mut self, position: usize, annotation: Annotation) {
        let position = position.min(self.annotations.len());
        self.annotations.insert(position, annotation);
    }

    /// Remove by id, returning the old position and the annotation.
    pub fn remove(&mut self, id: AnnotationId) -> Option<(usize, Annotation)> {
        let position = self.position_of(id)?;
        Some((position, self.annotations.remove(position)))
    }
}
