//! Pointer-driven bounding-box editor.
//!
//! [`AnnotationEditor`] classifies normalized pointer events into create,
//! select, move and resize gestures on the active photo. It is framework
//! free: a view adapter feeds it pointer positions in photo coordinates and
//! reads back the drawable state ([`AnnotationEditor::state`],
//! [`AnnotationEditor::highlighted`], [`AnnotationEditor::creation_preview`],
//! [`AnnotationEditor::metrics`]).
//!
//! Intermediate drag frames mutate the annotation live. Only completed
//! gestures are recorded in the undo log.

pub(crate) mod commands;
mod pointer;

#[cfg(test)]
mod tests;

use crate::config::EditorConfig;
use crate::geometry::{Corner, Point, Rect, Size, ui_scale};
use crate::model::{Annotation, AnnotationId, PhotoId, Project};
use crate::undo::UndoStack;

// ============================================================================
// Editor Types
// ============================================================================

/// Interaction mode of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// Idle, or dragging out a new box.
    #[default]
    Normal,
    /// Hovering a box; a drag will move or resize it.
    CanEnterDragMode,
    /// Translating a box.
    DragMode,
    /// Resizing a box through one corner handle.
    ResizeMode,
}

/// What the cursor is over after a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    /// Empty canvas (or no active photo).
    Canvas,
    /// The body of an annotation.
    Annotation(AnnotationId),
    /// A corner handle of the highlighted annotation.
    ResizeHandle(Corner),
}

/// Notifications for the view adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Created(AnnotationId),
    /// Open the label editor for this annotation.
    Selected(AnnotationId),
    Moved(AnnotationId),
    Resized(AnnotationId),
    Deleted(AnnotationId),
    Renamed(AnnotationId),
}

/// Interaction sizes for the active photo, already scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorMetrics {
    pub scale: f32,
    pub handle_size: f32,
    pub line_thickness: f32,
    pub label_size: f32,
    /// Minimum creatable area. Also used as the floor for a resized side.
    pub min_area: f32,
}

impl EditorMetrics {
    pub fn new(scale: f32, config: &EditorConfig) -> Self {
        Self {
            scale,
            handle_size: config.handle_size * scale,
            line_thickness: config.line_thickness * scale,
            label_size: config.label_size * scale,
            min_area: config.min_area * scale,
        }
    }

    /// Metrics for a photo displayed at `display`.
    pub fn for_display(display: Size, config: &EditorConfig) -> Self {
        Self::new(ui_scale(display), config)
    }
}

/// An in-progress move or resize.
#[derive(Debug, Clone, Copy)]
struct Gesture {
    target: AnnotationId,
    /// Pointer position when the gesture committed.
    anchor: Point,
    /// Geometry before the first live mutation.
    original: Rect,
    /// `None` for a move.
    corner: Option<Corner>,
}

// ============================================================================
// Annotation Editor
// ============================================================================

/// The interaction state machine for the active photo.
#[derive(Debug)]
pub struct AnnotationEditor {
    config: EditorConfig,
    photo: Option<PhotoId>,
    metrics: EditorMetrics,
    state: InteractionState,
    highlighted: Option<AnnotationId>,
    highlighted_handle: Option<Corner>,
    /// Press point of a box being dragged out.
    creation_anchor: Option<Point>,
    /// Box being dragged out, possibly with negative extents.
    creation_preview: Option<Rect>,
    gesture: Option<Gesture>,
}

impl Default for AnnotationEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl AnnotationEditor {
    pub fn new(config: EditorConfig) -> Self {
        let metrics = EditorMetrics::new(1.0, &config);
        Self {
            config,
            photo: None,
            metrics,
            state: InteractionState::Normal,
            highlighted: None,
            highlighted_handle: None,
            creation_anchor: None,
            creation_preview: None,
            gesture: None,
        }
    }

    /// Make `photo` the active photo.
    ///
    /// Any gesture in progress on the previous photo is abandoned. The UI
    /// scale is derived from the photo's display size, or its real size when
    /// no display size is known.
    pub fn activate(&mut self, project: &mut Project, photo: PhotoId) -> bool {
        self.abandon(project);
        let Some(object) = project.photo(photo) else {
            log::warn!("Cannot activate unknown photo {}", photo);
            self.photo = None;
            return false;
        };
        let scale = object.effective_display_size().map_or(1.0, ui_scale);
        self.metrics = EditorMetrics::new(scale, &self.config);
        self.photo = Some(photo);
        log::debug!("🖼️ Activated photo {} ({}) at scale {:.3}", photo, object.filename, scale);
        true
    }

    /// Clear the active photo, abandoning any gesture.
    pub fn deactivate(&mut self, project: &mut Project) {
        self.abandon(project);
        if self.photo.take().is_some() {
            log::debug!("🖼️ Editor deactivated");
        }
    }

    /// Drop a gesture without logging it, restoring live-mutated geometry.
    pub fn abandon(&mut self, project: &mut Project) {
        if let (Some(gesture), Some(photo)) = (self.gesture, self.photo) {
            if let Some(annotation) = project
                .photo_mut(photo)
                .and_then(|o| o.resolve_mut(gesture.target, gesture.original))
            {
                annotation.set_rect(gesture.original);
                log::debug!("Abandoned gesture on annotation {}", gesture.target);
            }
        }
        self.reset();
    }

    /// Return to `Normal` with nothing highlighted.
    fn reset(&mut self) {
        self.state = InteractionState::Normal;
        self.highlighted = None;
        self.highlighted_handle = None;
        self.creation_anchor = None;
        self.creation_preview = None;
        self.gesture = None;
    }

    /// Re-check references after the project changed underneath the editor
    /// (undo, redo, photo removal).
    pub fn validate(&mut self, project: &mut Project) {
        let Some(photo) = self.photo else {
            self.reset();
            return;
        };
        if project.photo(photo).is_none() {
            log::debug!("Active photo {} was removed", photo);
            self.photo = None;
            self.reset();
            return;
        }
        self.abandon(project);
    }

    // ------------------------------------------------------------------------
    // Drawable state
    // ------------------------------------------------------------------------

    pub fn active_photo(&self) -> Option<PhotoId> {
        self.photo
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn highlighted(&self) -> Option<AnnotationId> {
        self.highlighted
    }

    pub fn highlighted_handle(&self) -> Option<Corner> {
        self.highlighted_handle
    }

    /// The box being dragged out, as drawn (not standardized).
    pub fn creation_preview(&self) -> Option<Rect> {
        self.creation_preview
    }

    pub fn metrics(&self) -> EditorMetrics {
        self.metrics
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Discrete edits
    // ------------------------------------------------------------------------

    /// Delete the annotation at `position` on the active photo.
    pub fn delete_annotation(
        &mut self,
        project: &mut Project,
        undo: &mut UndoStack<Project>,
        position: usize,
    ) -> Option<EditorEvent> {
        self.abandon(project);
        let photo = self.photo?;
        let object = project.photo_mut(photo)?;
        if position >= object.annotations.len() {
            log::warn!("Delete: no annotation at position {}", position);
            return None;
        }
        let annotation = object.annotations.remove(position);
        let id = annotation.id;
        log::debug!("🗑️ Deleted annotation {} at position {}", id, position);
        undo.push_command(commands::delete(photo, position, annotation));
        Some(EditorEvent::Deleted(id))
    }

    /// Set an annotation's label without logging, for live text editing.
    pub fn set_label_live(&self, project: &mut Project, id: AnnotationId, text: &str) -> bool {
        let Some(annotation) = self.annotation_mut(project, id) else {
            return false;
        };
        annotation.label = text.to_string();
        true
    }

    /// Commit a label edit as one undo step.
    ///
    /// `old` is the label from before editing started; live keystrokes may
    /// already have changed the stored value. An empty label becomes
    /// `"No Label"`. Returns `None` if nothing changed.
    pub fn rename_annotation(
        &mut self,
        project: &mut Project,
        undo: &mut UndoStack<Project>,
        id: AnnotationId,
        old: &str,
        new: &str,
    ) -> Option<EditorEvent> {
        let photo = self.photo?;
        let new = match new.trim() {
            "" => crate::constants::NO_LABEL,
            trimmed => trimmed,
        };
        let annotation = self.annotation_mut(project, id)?;
        annotation.label = new.to_string();
        if old == new {
            return None;
        }
        let rect = annotation.rect();
        log::debug!("🏷️ Annotation {} renamed '{}' -> '{}'", id, old, new);
        undo.push_command(commands::rename(photo, id, rect, old.to_string(), new.to_string()));
        Some(EditorEvent::Renamed(id))
    }

    fn annotation_mut<'a>(&self, project: &'a mut Project, id: AnnotationId) -> Option<&'a mut Annotation> {
        project.photo_mut(self.photo?)?.get_mut(id)
    }
}
