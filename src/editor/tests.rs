//! Tests for the annotation editor.

use super::pointer::resize_from_corner;
use super::*;
use crate::constants::NO_LABEL;
use crate::geometry::Size;

// ============================================================================
// Helpers
// ============================================================================

struct Fixture {
    project: Project,
    undo: UndoStack<Project>,
    editor: AnnotationEditor,
    photo: PhotoId,
}

impl Fixture {
    /// One photo displayed at `width` x `height`, already activated.
    fn new(width: f32, height: f32) -> Self {
        let mut project = Project::new();
        let photo = project
            .new_photo("photo.jpg")
            .with_sizes(Size::new(width * 2.0, height * 2.0), Size::new(width, height));
        let id = photo.id;
        project.objects.push(photo);

        let mut editor = AnnotationEditor::default();
        assert!(editor.activate(&mut project, id));
        Self {
            project,
            undo: UndoStack::new(),
            editor,
            photo: id,
        }
    }

    fn with_box(mut self, rect: Rect) -> Self {
        self.add_box(rect);
        self
    }

    fn add_box(&mut self, rect: Rect) -> AnnotationId {
        let id = self.project.allocate_annotation_id();
        self.boxes_mut().push(Annotation::new(id, rect));
        id
    }

    fn boxes(&self) -> &[Annotation] {
        &self.project.photo(self.photo).unwrap().annotations
    }

    fn boxes_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.project.photo_mut(self.photo).unwrap().annotations
    }

    fn hover(&mut self, x: f32, y: f32) -> Hover {
        self.editor.pointer_moved(&self.project, Point::new(x, y))
    }

    fn down(&mut self, x: f32, y: f32) {
        self.editor.pointer_down(Point::new(x, y));
    }

    fn drag(&mut self, x: f32, y: f32) {
        self.editor.pointer_dragged(&mut self.project, Point::new(x, y));
    }

    fn up(&mut self, x: f32, y: f32) -> Vec<EditorEvent> {
        self.editor.pointer_up(&mut self.project, &mut self.undo, Point::new(x, y))
    }

    /// Full gesture: hover at `from`, press, drag through `from` and `to`, release.
    fn gesture(&mut self, from: (f32, f32), to: (f32, f32)) -> Vec<EditorEvent> {
        self.hover(from.0, from.1);
        self.down(from.0, from.1);
        self.drag(from.0, from.1);
        self.drag(to.0, to.1);
        self.up(to.0, to.1)
    }

    fn undo(&mut self) -> bool {
        let done = self.undo.undo(&mut self.project);
        self.editor.validate(&mut self.project);
        done
    }

    fn redo(&mut self) -> bool {
        let done = self.undo.redo(&mut self.project);
        self.editor.validate(&mut self.project);
        done
    }
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_scale_factor_from_display_size() {
    let fx = Fixture::new(800.0, 600.0);
    let metrics = fx.editor.metrics();
    assert!((metrics.scale - 1.4).abs() < 1e-6);
    assert!((metrics.min_area - 22.4).abs() < 1e-4);
    assert!((metrics.handle_size - 14.0).abs() < 1e-4);
    assert!((metrics.line_thickness - 5.6).abs() < 1e-4);
    assert!((metrics.label_size - 16.8).abs() < 1e-4);
}

#[test]
fn test_create_undo_redo_scenario() {
    let mut fx = Fixture::new(800.0, 600.0);

    assert_eq!(fx.hover(100.0, 100.0), Hover::Canvas);
    fx.down(100.0, 100.0);
    fx.drag(200.0, 180.0);
    assert_eq!(fx.editor.creation_preview(), Some(Rect::new(100.0, 100.0, 100.0, 80.0)));
    fx.drag(300.0, 250.0);
    let events = fx.up(300.0, 250.0);

    assert_eq!(fx.boxes().len(), 1);
    let created = fx.boxes()[0].clone();
    assert_eq!(created.rect(), Rect::new(100.0, 100.0, 200.0, 150.0));
    assert_eq!(created.label, NO_LABEL);
    assert_eq!(
        events,
        vec![EditorEvent::Created(created.id), EditorEvent::Selected(created.id)]
    );
    assert_eq!(fx.undo.undo_name(), Some("Create Annotation"));
    assert_eq!(fx.editor.state(), InteractionState::Normal);
    assert_eq!(fx.editor.creation_preview(), None);

    assert!(fx.undo());
    assert!(fx.boxes().is_empty());

    assert!(fx.redo());
    assert_eq!(fx.boxes(), &[created]);
}

#[test]
fn test_create_in_any_direction_is_standardized() {
    let mut fx = Fixture::new(500.0, 500.0);
    fx.gesture((300.0, 250.0), (100.0, 100.0));
    assert_eq!(fx.boxes()[0].rect(), Rect::new(100.0, 100.0, 200.0, 150.0));

    fx.gesture((400.0, 10.0), (350.0, 90.0));
    assert_eq!(fx.boxes()[1].rect(), Rect::new(350.0, 10.0, 50.0, 80.0));
}

#[test]
fn test_min_area_threshold() {
    // Scale 1.0: the threshold is exactly 16.
    let mut fx = Fixture::new(500.0, 500.0);

    let events = fx.gesture((10.0, 10.0), (14.0, 14.0));
    assert!(fx.boxes().is_empty());
    assert!(events.is_empty());
    assert!(!fx.undo.can_undo());

    fx.gesture((10.0, 10.0), (6.0, 6.0));
    assert!(fx.boxes().is_empty());

    fx.gesture((10.0, 10.0), (14.0, 14.5));
    assert_eq!(fx.boxes().len(), 1);
    assert_eq!(fx.undo.undo_count(), 1);
}

#[test]
fn test_click_without_hover_update_selects_box() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(0.0, 0.0, 50.0, 50.0));
    let id = fx.boxes()[0].id;

    // The last hover was over empty canvas, the press lands on the box.
    fx.hover(100.0, 100.0);
    fx.down(20.0, 20.0);
    let events = fx.up(20.0, 20.0);
    assert_eq!(events, vec![EditorEvent::Selected(id)]);
    assert_eq!(fx.boxes().len(), 1);
    assert!(!fx.undo.can_undo());
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_click_selects_on_pointer_up() {
    let mut fx = Fixture::new(500.0, 500.0)
        .with_box(Rect::new(0.0, 0.0, 100.0, 100.0))
        .with_box(Rect::new(50.0, 50.0, 100.0, 100.0));
    let first = fx.boxes()[0].id;

    assert_eq!(fx.hover(75.0, 75.0), Hover::Annotation(first));
    assert_eq!(fx.editor.state(), InteractionState::CanEnterDragMode);

    fx.down(75.0, 75.0);
    // Nothing starts on press.
    assert_eq!(fx.editor.state(), InteractionState::CanEnterDragMode);

    let events = fx.up(75.0, 75.0);
    assert_eq!(events, vec![EditorEvent::Selected(first)]);
    assert!(!fx.undo.can_undo());
    assert_eq!(fx.editor.state(), InteractionState::Normal);
    assert_eq!(fx.editor.highlighted(), None);
}

#[test]
fn test_hover_leaves_box() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(0.0, 0.0, 100.0, 100.0));
    fx.hover(50.0, 50.0);
    assert!(fx.editor.highlighted().is_some());

    assert_eq!(fx.hover(300.0, 300.0), Hover::Canvas);
    assert_eq!(fx.editor.state(), InteractionState::Normal);
    assert_eq!(fx.editor.highlighted(), None);
}

#[test]
fn test_handle_hover_outside_box_body() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(50.0, 50.0, 40.0, 40.0));
    fx.hover(85.0, 85.0);
    // Outer half of the bottom-right handle lies outside the box.
    assert_eq!(fx.hover(93.0, 93.0), Hover::ResizeHandle(Corner::BottomRight));
    assert_eq!(fx.editor.highlighted_handle(), Some(Corner::BottomRight));
    assert_eq!(fx.editor.state(), InteractionState::CanEnterDragMode);

    // Back to the body: the handle is cleared.
    assert!(matches!(fx.hover(70.0, 70.0), Hover::Annotation(_)));
    assert_eq!(fx.editor.highlighted_handle(), None);
}

#[test]
fn test_no_active_photo() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(0.0, 0.0, 100.0, 100.0));
    fx.editor.deactivate(&mut fx.project);
    assert_eq!(fx.hover(50.0, 50.0), Hover::Canvas);
    fx.down(10.0, 10.0);
    fx.drag(200.0, 200.0);
    assert!(fx.up(200.0, 200.0).is_empty());
    assert_eq!(fx.boxes().len(), 1);
}

// ============================================================================
// Move and resize
// ============================================================================

#[test]
fn test_move_is_live_and_logged_once() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(50.0, 50.0, 40.0, 40.0));
    let id = fx.boxes()[0].id;

    fx.hover(60.0, 60.0);
    fx.down(60.0, 60.0);
    fx.drag(60.0, 60.0);
    assert_eq!(fx.editor.state(), InteractionState::DragMode);
    fx.drag(65.0, 62.0);
    fx.drag(70.0, 80.0);
    assert_eq!(fx.boxes()[0].origin(), Point::new(60.0, 70.0));
    assert!(!fx.undo.can_undo());

    let events = fx.up(70.0, 80.0);
    assert_eq!(events, vec![EditorEvent::Moved(id)]);
    assert_eq!(fx.undo.undo_count(), 1);
    assert_eq!(fx.undo.undo_name(), Some("Move Annotation"));

    fx.undo();
    assert_eq!(fx.boxes()[0].rect(), Rect::new(50.0, 50.0, 40.0, 40.0));
    fx.redo();
    assert_eq!(fx.boxes()[0].rect(), Rect::new(60.0, 70.0, 40.0, 40.0));
}

#[test]
fn test_drag_back_to_start_is_not_logged() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(50.0, 50.0, 40.0, 40.0));
    fx.gesture((60.0, 60.0), (60.0, 60.0));
    assert!(!fx.undo.can_undo());
}

#[test]
fn test_resize_bottom_right_scenario() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(50.0, 50.0, 40.0, 40.0));
    let id = fx.boxes()[0].id;

    fx.hover(85.0, 85.0);
    assert_eq!(fx.hover(89.0, 89.0), Hover::ResizeHandle(Corner::BottomRight));
    fx.down(89.0, 89.0);
    fx.drag(89.0, 89.0);
    assert_eq!(fx.editor.state(), InteractionState::ResizeMode);
    fx.drag(109.0, 109.0);
    let events = fx.up(109.0, 109.0);
    assert_eq!(events, vec![EditorEvent::Resized(id)]);
    assert_eq!(fx.boxes()[0].rect(), Rect::new(50.0, 50.0, 60.0, 60.0));

    // Second gesture shrinks past the floor.
    fx.hover(105.0, 105.0);
    assert_eq!(fx.hover(109.0, 109.0), Hover::ResizeHandle(Corner::BottomRight));
    fx.down(109.0, 109.0);
    fx.drag(109.0, 109.0);
    fx.drag(59.0, 59.0);
    fx.up(59.0, 59.0);
    let floor = fx.editor.metrics().min_area;
    assert_eq!(fx.boxes()[0].rect(), Rect::new(50.0, 50.0, floor, floor));
    assert_eq!(fx.undo.undo_name(), Some("Resize Annotation"));

    fx.undo();
    assert_eq!(fx.boxes()[0].rect(), Rect::new(50.0, 50.0, 60.0, 60.0));
    fx.undo();
    assert_eq!(fx.boxes()[0].rect(), Rect::new(50.0, 50.0, 40.0, 40.0));
}

#[test]
fn test_corner_formulas() {
    let r = Rect::new(50.0, 50.0, 40.0, 40.0);
    let d = (-10.0, -5.0);
    assert_eq!(resize_from_corner(r, Corner::TopLeft, d, 1.0), Rect::new(60.0, 55.0, 30.0, 35.0));
    assert_eq!(resize_from_corner(r, Corner::TopRight, d, 1.0), Rect::new(50.0, 55.0, 50.0, 35.0));
    assert_eq!(resize_from_corner(r, Corner::BottomLeft, d, 1.0), Rect::new(60.0, 50.0, 30.0, 45.0));
    assert_eq!(resize_from_corner(r, Corner::BottomRight, d, 1.0), Rect::new(50.0, 50.0, 50.0, 45.0));
}

#[test]
fn test_resize_floor_never_violated() {
    let r = Rect::new(50.0, 50.0, 40.0, 40.0);
    let floor = 16.0;
    for corner in Corner::ALL {
        let mut current = r;
        for step in 1..20 {
            let push = step as f32 * 7.5;
            // Drag every corner inwards and past the opposite side.
            let delta = match corner {
                Corner::TopLeft => (-push, -push),
                Corner::TopRight => (push, -push),
                Corner::BottomLeft => (-push, push),
                Corner::BottomRight => (push, push),
            };
            current = resize_from_corner(current, corner, delta, floor);
            assert!(current.w >= floor, "{:?} width {}", corner, current.w);
            assert!(current.h >= floor, "{:?} height {}", corner, current.h);
        }
    }
}

// ============================================================================
// Abandoned gestures
// ============================================================================

#[test]
fn test_photo_switch_abandons_drag() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(50.0, 50.0, 40.0, 40.0));
    let other = fx.project.new_photo("other.jpg");
    let other_id = other.id;
    fx.project.objects.push(other);

    fx.hover(60.0, 60.0);
    fx.down(60.0, 60.0);
    fx.drag(60.0, 60.0);
    fx.drag(160.0, 160.0);
    assert_eq!(fx.boxes()[0].origin(), Point::new(150.0, 150.0));

    assert!(fx.editor.activate(&mut fx.project, other_id));
    assert_eq!(fx.editor.state(), InteractionState::Normal);
    assert_eq!(fx.boxes()[0].rect(), Rect::new(50.0, 50.0, 40.0, 40.0));
    assert!(!fx.undo.can_undo());

    // Release lands on the new photo and does nothing.
    assert!(fx.up(160.0, 160.0).is_empty());
    assert!(fx.project.photo(other_id).unwrap().annotations.is_empty());
}

#[test]
fn test_removed_photo_deactivates_editor() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(50.0, 50.0, 40.0, 40.0));
    fx.hover(60.0, 60.0);
    fx.down(60.0, 60.0);
    fx.drag(60.0, 60.0);

    fx.project.remove_photo(fx.photo);
    fx.editor.validate(&mut fx.project);
    assert_eq!(fx.editor.active_photo(), None);
    assert_eq!(fx.editor.state(), InteractionState::Normal);
}

// ============================================================================
// Delete and rename
// ============================================================================

#[test]
fn test_delete_restores_position() {
    let mut fx = Fixture::new(500.0, 500.0)
        .with_box(Rect::new(0.0, 0.0, 10.0, 10.0))
        .with_box(Rect::new(20.0, 0.0, 10.0, 10.0))
        .with_box(Rect::new(40.0, 0.0, 10.0, 10.0));
    let before = fx.boxes().to_vec();

    let event = fx.editor.delete_annotation(&mut fx.project, &mut fx.undo, 1);
    assert_eq!(event, Some(EditorEvent::Deleted(before[1].id)));
    assert_eq!(fx.boxes().len(), 2);

    fx.undo();
    assert_eq!(fx.boxes(), before.as_slice());
    fx.redo();
    assert_eq!(fx.boxes(), &[before[0].clone(), before[2].clone()]);

    assert_eq!(fx.editor.delete_annotation(&mut fx.project, &mut fx.undo, 9), None);
}

#[test]
fn test_live_label_edits_commit_as_one_step() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(0.0, 0.0, 10.0, 10.0));
    let id = fx.boxes()[0].id;

    for text in ["c", "ca", "cat"] {
        assert!(fx.editor.set_label_live(&mut fx.project, id, text));
    }
    assert!(!fx.undo.can_undo());

    let event = fx
        .editor
        .rename_annotation(&mut fx.project, &mut fx.undo, id, NO_LABEL, "cat");
    assert_eq!(event, Some(EditorEvent::Renamed(id)));
    assert_eq!(fx.undo.undo_count(), 1);

    fx.undo();
    assert_eq!(fx.boxes()[0].label, NO_LABEL);
    fx.redo();
    assert_eq!(fx.boxes()[0].label, "cat");
}

#[test]
fn test_rename_to_empty_is_unlabeled() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(0.0, 0.0, 10.0, 10.0));
    let id = fx.boxes()[0].id;
    fx.boxes_mut()[0].label = "cat".to_string();

    fx.editor
        .rename_annotation(&mut fx.project, &mut fx.undo, id, "cat", "   ");
    assert_eq!(fx.boxes()[0].label, NO_LABEL);

    // Unchanged label: nothing logged.
    let before = fx.undo.undo_count();
    assert_eq!(
        fx.editor
            .rename_annotation(&mut fx.project, &mut fx.undo, id, NO_LABEL, NO_LABEL),
        None
    );
    assert_eq!(fx.undo.undo_count(), before);
}

// ============================================================================
// History properties
// ============================================================================

#[test]
fn test_mixed_sequence_round_trip() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(300.0, 300.0, 50.0, 50.0));
    let snapshot = fx.boxes().to_vec();

    // Create, move, resize, rename, delete.
    fx.gesture((10.0, 10.0), (110.0, 60.0));
    let created = fx.boxes()[1].id;
    fx.gesture((50.0, 30.0), (70.0, 40.0));
    fx.hover(125.0, 65.0);
    fx.hover(129.0, 69.0);
    fx.down(129.0, 69.0);
    fx.drag(129.0, 69.0);
    fx.drag(150.0, 100.0);
    fx.up(150.0, 100.0);
    fx.editor
        .rename_annotation(&mut fx.project, &mut fx.undo, created, NO_LABEL, "car");
    fx.editor.delete_annotation(&mut fx.project, &mut fx.undo, 0);
    assert_eq!(fx.undo.undo_count(), 5);
    let edited = fx.boxes().to_vec();

    while fx.undo() {}
    assert_eq!(fx.boxes(), snapshot.as_slice());

    while fx.redo() {}
    assert_eq!(fx.boxes(), edited.as_slice());

    for _ in 0..5 {
        fx.undo();
    }
    assert_eq!(fx.boxes(), snapshot.as_slice());
}

#[test]
fn test_undo_falls_back_to_geometry() {
    let mut fx = Fixture::new(500.0, 500.0).with_box(Rect::new(50.0, 50.0, 40.0, 40.0));
    fx.gesture((60.0, 60.0), (70.0, 60.0));
    assert_eq!(fx.boxes()[0].origin(), Point::new(60.0, 50.0));

    // Replace the box with an equal copy under a new id.
    let copy_id = fx.project.allocate_annotation_id();
    let mut copy = fx.boxes()[0].clone();
    copy.id = copy_id;
    fx.boxes_mut()[0] = copy;

    fx.undo();
    assert_eq!(fx.boxes()[0].id, copy_id);
    assert_eq!(fx.boxes()[0].origin(), Point::new(50.0, 50.0));
}

#[test]
fn test_undo_with_missing_target_is_noop() {
    let mut fx = Fixture::new(500.0, 500.0);
    fx.gesture((10.0, 10.0), (110.0, 60.0));
    fx.boxes_mut().clear();

    assert!(fx.undo());
    assert!(fx.boxes().is_empty());
    // Redo puts the box back.
    assert!(fx.redo());
    assert_eq!(fx.boxes().len(), 1);
}
