//! Pointer event handling for the annotation editor.

use super::{AnnotationEditor, EditorEvent, Gesture, Hover, InteractionState, commands};
use crate::geometry::{Corner, Point, Rect};
use crate::model::{Annotation, PhotoId, Project};
use crate::undo::UndoStack;

/// Apply a corner drag to `original`.
///
/// `delta` is `anchor - pointer`. Any side that ends up below `floor` is
/// forced up to it.
pub(crate) fn resize_from_corner(original: Rect, corner: Corner, delta: (f32, f32), floor: f32) -> Rect {
    let (dx, dy) = delta;
    let mut r = original;
    match corner {
        Corner::TopLeft => {
            r.x -= dx;
            r.y -= dy;
            r.w += dx;
            r.h += dy;
        }
        Corner::TopRight => {
            r.y -= dy;
            r.w -= dx;
            r.h += dy;
        }
        Corner::BottomLeft => {
            r.x -= dx;
            r.w += dx;
            r.h -= dy;
        }
        Corner::BottomRight => {
            r.w -= dx;
            r.h -= dy;
        }
    }
    if r.w < floor {
        r.w = floor;
    }
    if r.h < floor {
        r.h = floor;
    }
    r
}

impl AnnotationEditor {
    /// Cursor moved with no button held.
    pub fn pointer_moved(&mut self, project: &Project, point: Point) -> Hover {
        let Some(object) = self.photo.and_then(|id| project.photo(id)) else {
            self.reset();
            return Hover::Canvas;
        };

        // Button-held gestures only react to drags.
        if self.gesture.is_some() || self.creation_anchor.is_some() {
            return self.current_hover();
        }

        if self.state == InteractionState::CanEnterDragMode {
            let handle = self
                .highlighted
                .and_then(|id| object.get(id))
                .and_then(|a| a.rect().handle_at(point, self.metrics.handle_size));
            self.highlighted_handle = handle;
            if let Some(corner) = handle {
                return Hover::ResizeHandle(corner);
            }
        }

        match object.hit_test(point) {
            Some(annotation) => {
                self.highlighted = Some(annotation.id);
                self.state = InteractionState::CanEnterDragMode;
                Hover::Annotation(annotation.id)
            }
            None => {
                self.state = InteractionState::Normal;
                self.highlighted = None;
                self.highlighted_handle = None;
                Hover::Canvas
            }
        }
    }

    fn current_hover(&self) -> Hover {
        match (self.highlighted_handle, self.highlighted) {
            (Some(corner), _) => Hover::ResizeHandle(corner),
            (None, Some(id)) => Hover::Annotation(id),
            (None, None) => Hover::Canvas,
        }
    }

    /// Button pressed.
    ///
    /// Over a box nothing happens yet: the first drag tick decides between
    /// move and resize, and a click without movement selects on release.
    pub fn pointer_down(&mut self, point: Point) {
        if self.photo.is_none() {
            return;
        }
        if self.state == InteractionState::Normal && self.highlighted.is_none() {
            self.creation_anchor = Some(point);
            self.creation_preview = Some(Rect::new(point.x, point.y, 0.0, 0.0));
        }
    }

    /// Pointer moved with the button held.
    pub fn pointer_dragged(&mut self, project: &mut Project, point: Point) {
        let Some(photo) = self.photo else {
            return;
        };

        match self.state {
            InteractionState::Normal => {
                if let Some(anchor) = self.creation_anchor {
                    self.creation_preview =
                        Some(Rect::new(anchor.x, anchor.y, point.x - anchor.x, point.y - anchor.y));
                }
            }
            InteractionState::CanEnterDragMode => {
                let Some(annotation) = self
                    .highlighted
                    .and_then(|id| project.photo(photo).and_then(|o| o.get(id)))
                else {
                    self.reset();
                    return;
                };
                let corner = self.highlighted_handle;
                self.gesture = Some(Gesture {
                    target: annotation.id,
                    anchor: point,
                    original: annotation.rect(),
                    corner,
                });
                self.state = match corner {
                    Some(_) => InteractionState::ResizeMode,
                    None => InteractionState::DragMode,
                };
                log::debug!("✋ {:?} on annotation {}", self.state, annotation.id);
            }
            InteractionState::DragMode | InteractionState::ResizeMode => {
                let Some(gesture) = self.gesture else {
                    self.reset();
                    return;
                };
                let floor = self.metrics.min_area;
                let Some(annotation) = project
                    .photo_mut(photo)
                    .and_then(|o| o.get_mut(gesture.target))
                else {
                    return;
                };
                let delta = gesture.anchor.delta_to(point);
                match gesture.corner {
                    None => {
                        let origin = gesture.original.origin();
                        annotation.set_origin(Point::new(origin.x - delta.0, origin.y - delta.1));
                    }
                    Some(corner) => {
                        annotation.set_rect(resize_from_corner(gesture.original, corner, delta, floor));
                    }
                }
            }
        }
    }

    /// Button released.
    ///
    /// Commits the gesture to `undo` and always returns the editor to
    /// `Normal` with nothing highlighted.
    pub fn pointer_up(
        &mut self,
        project: &mut Project,
        undo: &mut UndoStack<Project>,
        point: Point,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        if let Some(photo) = self.photo {
            match self.state {
                InteractionState::Normal => self.finish_creation(project, undo, photo, point, &mut events),
                InteractionState::CanEnterDragMode => {
                    let hit = project
                        .photo(photo)
                        .and_then(|o| o.hit_test(point))
                        .map(|a| a.id)
                        .or(self.highlighted);
                    if let Some(id) = hit {
                        events.push(EditorEvent::Selected(id));
                    }
                }
                InteractionState::DragMode | InteractionState::ResizeMode => {
                    if let Some(gesture) = self.gesture {
                        self.finish_reshape(project, undo, photo, gesture, &mut events);
                    }
                }
            }
        }
        self.reset();
        events
    }

    fn finish_creation(
        &self,
        project: &mut Project,
        undo: &mut UndoStack<Project>,
        photo: PhotoId,
        point: Point,
        events: &mut Vec<EditorEvent>,
    ) {
        let preview = self
            .creation_anchor
            .map(|a| Rect::new(a.x, a.y, point.x - a.x, point.y - a.y));

        let Some(preview) = preview.filter(|r| r.area().abs() > self.metrics.min_area) else {
            // A click: report the box under the release point.
            if let Some(annotation) = project.photo(photo).and_then(|o| o.hit_test(point)) {
                events.push(EditorEvent::Selected(annotation.id));
            }
            return;
        };

        let id = project.allocate_annotation_id();
        let annotation = Annotation::new(id, preview.standardized());
        let Some(object) = project.photo_mut(photo) else {
            return;
        };
        object.annotations.push(annotation.clone());
        log::debug!("➕ Created annotation {} at {:?}", id, annotation.rect());
        undo.push_command(commands::create(photo, annotation));
        events.push(EditorEvent::Created(id));
        events.push(EditorEvent::Selected(id));
    }

    fn finish_reshape(
        &self,
        project: &mut Project,
        undo: &mut UndoStack<Project>,
        photo: PhotoId,
        gesture: Gesture,
        events: &mut Vec<EditorEvent>,
    ) {
        let Some(after) = project
            .photo(photo)
            .and_then(|o| o.get(gesture.target))
            .map(Annotation::rect)
        else {
            return;
        };
        if after == gesture.original {
            return;
        }
        let (name, event) = match gesture.corner {
            None => (commands::MOVE, EditorEvent::Moved(gesture.target)),
            Some(_) => (commands::RESIZE, EditorEvent::Resized(gesture.target)),
        };
        log::debug!("📐 {} {}: {:?} -> {:?}", name, gesture.target, gesture.original, after);
        undo.push_command(commands::reshape(name, photo, gesture.target, gesture.original, after));
        events.push(event);
    }
}
