//! Unit tests for project persistence and manifest formats.
//!
//! These tests check the exact manifest text each exporter produces, the
//! Turi coordinate remap, and project file round trips.

mod turi_tests;

use crate::geometry::{Rect, Size};
use crate::model::{Annotation, PhotoAnnotation, Project};

/// Two photos: one displayed at half its real size with two boxes, one
/// without annotations.
fn create_test_project() -> Project {
    let mut project = Project::new();

    let mut photo = project
        .new_photo("cat.jpg")
        .with_sizes(Size::new(1600.0, 1200.0), Size::new(800.0, 600.0));
    let a = project.allocate_annotation_id();
    photo
        .annotations
        .push(Annotation::new(a, Rect::new(100.0, 100.0, 200.0, 150.0)).with_label("cat"));
    let b = project.allocate_annotation_id();
    photo
        .annotations
        .push(Annotation::new(b, Rect::new(0.0, 0.0, 50.0, 50.0)));
    project.objects.push(photo);

    let empty = project
        .new_photo("empty.png")
        .with_sizes(Size::new(640.0, 480.0), Size::new(640.0, 480.0));
    project.objects.push(empty);

    project.custom_labels.push("dog".to_string());
    project
}

/// A unique scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("annotate-ml-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn photo_without_sizes(id: u64) -> PhotoAnnotation {
    PhotoAnnotation::new(id, "unsized.jpg")
}
