//! Undo entries for project-level edits: photos and labels.

use crate::model::{PhotoAnnotation, PhotoId, Project};
use crate::undo::Command;

pub(crate) const IMPORT_PHOTOS: &str = "Import Photos";
pub(crate) const IMPORT_PHOTO: &str = "Import Photo";
pub(crate) const REMOVE_PHOTO: &str = "Remove Photo";
pub(crate) const RENAME_LABEL: &str = "Rename Label";
pub(crate) const ADD_LABEL: &str = "Add Custom Label";
pub(crate) const REMOVE_LABEL: &str = "Remove Custom Label";

fn insert_photo(project: &mut Project, index: usize, photo: &PhotoAnnotation) {
    if project.photo(photo.id).is_some() {
        log::warn!("Undo: photo {} already present, skipping", photo.id);
        return;
    }
    project.insert_photo(index, photo.clone());
}

fn remove_photo(project: &mut Project, id: PhotoId) {
    if project.remove_photo(id).is_none() {
        log::warn!("Undo: photo {} not found, skipping", id);
    }
}

/// Entry for a photo inserted at `index`.
pub(crate) fn import_photo(index: usize, photo: PhotoAnnotation) -> Command<Project> {
    let id = photo.id;
    Command::new(
        IMPORT_PHOTO,
        move |p: &mut Project| remove_photo(p, id),
        move |p: &mut Project| insert_photo(p, index, &photo),
    )
}

/// Entry for a photo (and its annotations) removed from `index`.
pub(crate) fn remove(index: usize, photo: PhotoAnnotation) -> Command<Project> {
    let id = photo.id;
    Command::new(
        REMOVE_PHOTO,
        move |p: &mut Project| insert_photo(p, index, &photo),
        move |p: &mut Project| remove_photo(p, id),
    )
}

/// Entry for a mass rename. Each direction is the other's inverse.
///
/// Replays skip validation: the rename was checked when the user made it.
pub(crate) fn rename_label(old: String, new: String) -> Command<Project> {
    let (undo_from, undo_to) = (new.clone(), old.clone());
    Command::new(
        RENAME_LABEL,
        move |p: &mut Project| p.apply_rename(&undo_from, &undo_to),
        move |p: &mut Project| p.apply_rename(&old, &new),
    )
}

fn remove_custom_named(project: &mut Project, name: &str) {
    match project.custom_labels.iter().position(|l| l == name) {
        Some(index) => {
            project.custom_labels.remove(index);
        }
        None => log::warn!("Undo: custom label '{}' not found, skipping", name),
    }
}

fn insert_custom(project: &mut Project, index: usize, name: &str) {
    if project.custom_labels.iter().any(|l| l == name) {
        log::warn!("Undo: custom label '{}' already exists, skipping", name);
        return;
    }
    // A label never sits in both lists.
    project.labels.retain(|l| l != name);
    project.insert_custom_label(index, name.to_string());
}

/// Entry for a custom label appended at `index`.
pub(crate) fn add_custom_label(index: usize, name: String) -> Command<Project> {
    let undo_name = name.clone();
    Command::new(
        ADD_LABEL,
        move |p: &mut Project| remove_custom_named(p, &undo_name),
        move |p: &mut Project| insert_custom(p, index, &name),
    )
}

/// Entry for a custom label removed from `index`.
pub(crate) fn remove_custom_label(index: usize, name: String) -> Command<Project> {
    let redo_name = name.clone();
    Command::new(
        REMOVE_LABEL,
        move |p: &mut Project| insert_custom(p, index, &name),
        move |p: &mut Project| remove_custom_named(p, &redo_name),
    )
}
