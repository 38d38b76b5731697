//! The in-memory project: photos, their annotations and the label lists.

use super::annotation::{Annotation, AnnotationId};
use super::photo::{PhotoAnnotation, PhotoId};
use crate::constants::CUSTOM_LABEL_BASE;

/// Document state shared by the editor, the label registry and undo entries.
///
/// All mutation happens on the UI thread. Background work (label indexing)
/// only ever sees snapshots taken from here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    /// Imported photos in table order.
    pub objects: Vec<PhotoAnnotation>,
    /// Labels detected from annotation usage.
    pub labels: Vec<String>,
    /// User-declared labels, independent of usage.
    pub custom_labels: Vec<String>,
    next_annotation_id: AnnotationId,
    next_photo_id: PhotoId,
}

impl Project {
    pub fn new() -> Self {
        Self {
            next_annotation_id: 1,
            next_photo_id: 1,
            ..Default::default()
        }
    }

    /// Rebuild a project from loaded parts, resuming id allocation after the
    /// largest id in use.
    pub fn from_parts(objects: Vec<PhotoAnnotation>, custom_labels: Vec<String>) -> Self {
        let next_photo_id = objects.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let next_annotation_id = objects
            .iter()
            .flat_map(|o| o.annotations.iter().map(|a| a.id))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            objects,
            labels: Vec::new(),
            custom_labels,
            next_annotation_id,
            next_photo_id,
        }
    }

    pub fn allocate_annotation_id(&mut self) -> AnnotationId {
        let id = self.next_annotation_id.max(1);
        self.next_annotation_id = id + 1;
        id
    }

    fn allocate_photo_id(&mut self) -> PhotoId {
        let id = self.next_photo_id.max(1);
        self.next_photo_id = id + 1;
        id
    }

    /// Create a photo entry with a fresh id. It is not inserted.
    pub fn new_photo(&mut self, filename: impl Into<String>) -> PhotoAnnotation {
        let id = self.allocate_photo_id();
        PhotoAnnotation::new(id, filename)
    }

    /// Detected labels followed by custom labels.
    pub fn all_labels(&self) -> Vec<String> {
        self.labels
            .iter()
            .chain(self.custom_labels.iter())
            .cloned()
            .collect()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label) || self.custom_labels.iter().any(|l| l == label)
    }

    /// Whether any annotation carries `label`, regardless of indexing.
    pub fn label_in_use(&self, label: &str) -> bool {
        self.objects
            .iter()
            .flat_map(|o| o.annotations.iter())
            .any(|a| a.label == label)
    }

    fn label_taken(&self, label: &str) -> bool {
        self.has_label(label) || self.label_in_use(label)
    }

    // ========================================================================
    // Photos
    // ========================================================================

    pub fn photo(&self, id: PhotoId) -> Option<&PhotoAnnotation> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn photo_mut(&mut self, id: PhotoId) -> Option<&mut PhotoAnnotation> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn photo_index(&self, id: PhotoId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Insert a photo at `index`, clamped to the end of the list.
    pub fn insert_photo(&mut self, index: usize, photo: PhotoAnnotation) {
        let index = index.min(self.objects.len());
        self.objects.insert(index, photo);
    }

    /// Remove a photo by id, returning its old index and the photo.
    pub fn remove_photo(&mut self, id: PhotoId) -> Option<(usize, PhotoAnnotation)> {
        let index = self.photo_index(id)?;
        Some((index, self.objects.remove(index)))
    }

    pub fn annotation(&self, photo: PhotoId, id: AnnotationId) -> Option<&Annotation> {
        self.photo(photo)?.get(id)
    }

    /// Total number of annotations across all photos.
    pub fn annotation_count(&self) -> usize {
        self.objects.iter().map(|o| o.annotations.len()).sum()
    }

    // ========================================================================
    // Custom labels
    // ========================================================================

    /// Next unused name for a custom label.
    ///
    /// The first one is plain `"Custom Label"`, later ones get the new list
    /// length appended, bumped until the name is free. Annotation labels are
    /// checked directly since the detected list may not be reindexed yet.
    pub fn next_custom_label_name(&self) -> String {
        let count = self.custom_labels.len();
        if count == 0 && !self.label_taken(CUSTOM_LABEL_BASE) {
            return CUSTOM_LABEL_BASE.to_string();
        }
        let mut n = count + 1;
        loop {
            let candidate = format!("{} {}", CUSTOM_LABEL_BASE, n);
            if !self.label_taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Insert a custom label at `index` (clamped).
    pub fn insert_custom_label(&mut self, index: usize, label: String) {
        let index = index.min(self.custom_labels.len());
        self.custom_labels.insert(index, label);
    }

    pub fn remove_custom_label(&mut self, index: usize) -> Option<String> {
        (index < self.custom_labels.len()).then(|| self.custom_labels.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_from_parts_resumes_ids() {
        let mut photo = PhotoAnnotation::new(4, "a.png");
        photo.annotations.push(Annotation::new(9, Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mut project = Project::from_parts(vec![photo], Vec::new());

        assert_eq!(project.allocate_annotation_id(), 10);
        assert_eq!(project.new_photo("b.png").id, 5);
    }

    #[test]
    fn test_custom_label_names_are_unique() {
        let mut project = Project::new();
        let first = project.next_custom_label_name();
        assert_eq!(first, "Custom Label");
        project.custom_labels.push(first);

        assert_eq!(project.next_custom_label_name(), "Custom Label 2");
        project.labels.push("Custom Label 2".to_string());
        assert_eq!(project.next_custom_label_name(), "Custom Label 3");
    }

    #[test]
    fn test_custom_label_name_skips_unindexed_annotations() {
        let mut photo = PhotoAnnotation::new(1, "a.png");
        let mut annotation = Annotation::new(1, Rect::new(0.0, 0.0, 10.0, 10.0));
        annotation.label = "Custom Label".to_string();
        photo.annotations.push(annotation);
        let mut annotation = Annotation::new(2, Rect::new(20.0, 0.0, 10.0, 10.0));
        annotation.label = "Custom Label 2".to_string();
        photo.annotations.push(annotation);
        let mut project = Project::from_parts(vec![photo], Vec::new());
        assert!(project.labels.is_empty());

        assert!(project.label_in_use("Custom Label 2"));
        assert_eq!(project.next_custom_label_name(), "Custom Label 1");
        project.custom_labels.push("Custom Label 1".to_string());
        assert_eq!(project.next_custom_label_name(), "Custom Label 3");
    }

    #[test]
    fn test_all_labels_order() {
        let mut project = Project::new();
        project.labels = vec!["cat".into(), "dog".into()];
        project.custom_labels = vec!["bird".into()];
        assert_eq!(project.all_labels(), vec!["cat", "dog", "bird"]);
        assert!(project.has_label("bird"));
        assert!(!project.has_label("fish"));
    }
}
