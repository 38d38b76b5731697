//! Undo entries for annotation edits.
//!
//! Every entry addresses its annotation by photo id and annotation id, with
//! the annotation's expected geometry as a fallback key. An entry whose
//! target cannot be found does nothing.

use crate::geometry::Rect;
use crate::model::{Annotation, AnnotationId, PhotoId, Project};
use crate::undo::Command;

pub(crate) const CREATE: &str = "Create Annotation";
pub(crate) const DELETE: &str = "Delete Annotation";
pub(crate) const MOVE: &str = "Move Annotation";
pub(crate) const RESIZE: &str = "Resize Annotation";
pub(crate) const RENAME: &str = "Rename Annotation";

fn remove_annotation(project: &mut Project, photo: PhotoId, id: AnnotationId, rect: Rect) {
    let Some(object) = project.photo_mut(photo) else {
        log::warn!("Undo: photo {} is gone, skipping", photo);
        return;
    };
    let position = object.position_of(id).or_else(|| object.position_of_rect(rect));
    match position {
        Some(position) => {
            object.annotations.remove(position);
        }
        None => log::warn!("Undo: annotation {} not found, skipping", id),
    }
}

fn insert_annotation(project: &mut Project, photo: PhotoId, position: usize, annotation: &Annotation) {
    let Some(object) = project.photo_mut(photo) else {
        log::warn!("Undo: photo {} is gone, skipping", photo);
        return;
    };
    if object.position_of(annotation.id).is_some() {
        log::warn!("Undo: annotation {} already present, skipping", annotation.id);
        return;
    }
    object.insert_at(position, annotation.clone());
}

fn set_rect(project: &mut Project, photo: PhotoId, id: AnnotationId, from: Rect, to: Rect) {
    match project.photo_mut(photo).and_then(|o| o.resolve_mut(id, from)) {
        Some(annotation) => annotation.set_rect(to),
        None => log::warn!("Undo: annotation {} not found, skipping", id),
    }
}

fn set_label(project: &mut Project, photo: PhotoId, id: AnnotationId, rect: Rect, label: &str) {
    match project.photo_mut(photo).and_then(|o| o.resolve_mut(id, rect)) {
        Some(annotation) => annotation.label = label.to_string(),
        None => log::warn!("Undo: annotation {} not found, skipping", id),
    }
}

/// Entry for an annotation appended at the end of `photo`'s list.
pub(crate) fn create(photo: PhotoId, annotation: Annotation) -> Command<Project> {
    let rect = annotation.rect();
    let id = annotation.id;
    Command::new(
        CREATE,
        move |p: &mut Project| remove_annotation(p, photo, id, rect),
        move |p: &mut Project| {
            let end = p.photo(photo).map_or(0, |o| o.annotations.len());
            insert_annotation(p, photo, end, &annotation);
        },
    )
}

/// Entry for an annotation removed from `position`.
pub(crate) fn delete(photo: PhotoId, position: usize, annotation: Annotation) -> Command<Project> {
    let rect = annotation.rect();
    let id = annotation.id;
    Command::new(
        DELETE,
        move |p: &mut Project| insert_annotation(p, photo, position, &annotation),
        move |p: &mut Project| remove_annotation(p, photo, id, rect),
    )
}

/// Entry for a geometry change (move or resize).
pub(crate) fn reshape(
    name: &'static str,
    photo: PhotoId,
    id: AnnotationId,
    before: Rect,
    after: Rect,
) -> Command<Project> {
    Command::new(
        name,
        move |p: &mut Project| set_rect(p, photo, id, after, before),
        move |p: &mut Project| set_rect(p, photo, id, before, after),
    )
}

/// Entry for a single-annotation label change.
pub(crate) fn rename(
    photo: PhotoId,
    id: AnnotationId,
    rect: Rect,
    old: String,
    new: String,
) -> Command<Project> {
    Command::new(
        RENAME,
        move |p: &mut Project| set_label(p, photo, id, rect, &old),
        move |p: &mut Project| set_label(p, photo, id, rect, &new),
    )
}
