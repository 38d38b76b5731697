//! One open project and everything that edits it.
//!
//! [`Session`] is the single-threaded entry point a view adapter drives. It
//! owns the [`Project`], its undo history, the [`AnnotationEditor`] and the
//! [`LabelRegistry`], and reports every committed change to the
//! [`Document`] collaborator. Label reindexing runs in the background; call
//! [`Session::poll_labels`] from the UI loop to pick up results.

mod commands;


use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use crate::config::EditorConfig;
use crate::document::{ChangeKind, Document};
use crate::editor::{AnnotationEditor, EditorEvent, Hover};
use crate::geometry::{Point, Size};
use crate::labels::{LabelError, LabelRegistry, LabelSnapshot, label_tally};
use crate::model::{AnnotationId, PhotoId, Project};
use crate::suggest::{LabelClassifier, crop_region};
use crate::undo::{UndoConfig, UndoStack};

/// An in-progress photo import.
#[derive(Debug, Clone, Copy)]
struct ImportBatch {
    /// Index the next imported photo is inserted at.
    cursor: usize,
    imported: usize,
}

/// A label edit started from the editor's popover.
#[derive(Debug, Clone)]
struct LabelEdit {
    id: AnnotationId,
    original: String,
}

/// Editing session over one project.
pub struct Session<D: Document> {
    project: Project,
    undo: UndoStack<Project>,
    editor: AnnotationEditor,
    labels: LabelRegistry,
    document: D,
    classifier: Option<Box<dyn LabelClassifier>>,
    import: Option<ImportBatch>,
    label_edit: Option<LabelEdit>,
}

impl<D: Document> Session<D> {
    /// Start a session on an empty project.
    pub fn new(document: D, config: EditorConfig) -> Self {
        let undo = UndoStack::with_config(UndoConfig {
            max_history: config.max_history,
        });
        Self {
            project: Project::new(),
            undo,
            editor: AnnotationEditor::new(config),
            labels: LabelRegistry::new(),
            document,
            classifier: None,
            import: None,
            label_edit: None,
        }
    }

    /// Attach a classifier for [`Session::suggest_labels`].
    pub fn with_classifier(mut self, classifier: Box<dyn LabelClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Replace the project, dropping history and editor state.
    pub fn load_project(&mut self, project: Project) {
        self.editor.deactivate(&mut self.project);
        self.project = project;
        self.undo.clear();
        self.import = None;
        self.label_edit = None;
        log::info!(
            "Loaded project: {} photos, {} annotations",
            self.project.objects.len(),
            self.project.annotation_count()
        );
        self.document.project_did_load();
        self.request_reindex();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn editor(&self) -> &AnnotationEditor {
        &self.editor
    }

    pub fn undo_stack(&self) -> &UndoStack<Project> {
        &self.undo
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Usage count per label in [`Project::all_labels`].
    pub fn label_tally(&self) -> HashMap<String, usize> {
        label_tally(&self.project.objects, &self.project.all_labels())
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    fn request_reindex(&mut self) {
        self.labels
            .request_reindex(LabelSnapshot::capture(&self.project));
    }

    /// Report a committed mutation.
    fn committed(&mut self, labels_touched: bool) {
        self.document.mark(ChangeKind::Done);
        if labels_touched {
            self.request_reindex();
            self.document.project_changed();
        }
    }

    /// Apply a finished background reindex, if any. Returns true if the
    /// detected labels changed.
    pub fn poll_labels(&mut self) -> bool {
        let changed = self.labels.poll(&mut self.project);
        if changed {
            self.document.project_changed();
        }
        changed
    }

    /// Block until the latest reindex is applied, or `timeout` passes.
    pub fn wait_for_labels(&mut self, timeout: Duration) -> bool {
        let changed = self.labels.poll_blocking(&mut self.project, timeout);
        if changed {
            self.document.project_changed();
        }
        changed
    }

    // ========================================================================
    // Active photo
    // ========================================================================

    /// Load the photo at `index` into the editor.
    ///
    /// Reads the image through the document to learn its pixel size. If the
    /// bytes are unavailable or unreadable the editor is left deactivated
    /// and false is returned.
    pub fn activate_photo(&mut self, index: usize) -> bool {
        let Some(object) = self.project.objects.get(index) else {
            self.editor.deactivate(&mut self.project);
            return false;
        };
        let id = object.id;

        let size = match self.document.photo_bytes(object, false) {
            Some(bytes) => read_dimensions(&bytes),
            None => {
                log::warn!("No image data for photo '{}'", object.filename);
                None
            }
        };
        let Some(real) = size else {
            self.editor.deactivate(&mut self.project);
            return false;
        };

        if let Some(object) = self.project.photo_mut(id) {
            object.real_size = Some(real);
            if object.display_size.is_none() {
                object.display_size = Some(real);
            }
        }
        self.editor.activate(&mut self.project, id)
    }

    /// Record the size the adapter displays `photo` at.
    ///
    /// This is cached state, not an edit: it is not logged. If the photo is
    /// active its UI scale is recomputed.
    pub fn set_display_size(&mut self, photo: PhotoId, size: Size) {
        let Some(object) = self.project.photo_mut(photo) else {
            return;
        };
        object.display_size = Some(size);
        if self.editor.active_photo() == Some(photo) {
            self.editor.activate(&mut self.project, photo);
        }
    }

    pub fn deactivate_photo(&mut self) {
        self.editor.deactivate(&mut self.project);
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    pub fn pointer_moved(&mut self, point: Point) -> Hover {
        self.editor.pointer_moved(&self.project, point)
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.editor.pointer_down(point);
    }

    pub fn pointer_dragged(&mut self, point: Point) {
        self.editor.pointer_dragged(&mut self.project, point);
    }

    pub fn pointer_up(&mut self, point: Point) -> Vec<EditorEvent> {
        let events = self
            .editor
            .pointer_up(&mut self.project, &mut self.undo, point);
        if events.iter().any(|e| !matches!(e, EditorEvent::Selected(_))) {
            self.committed(false);
        }
        events
    }

    // ========================================================================
    // Annotation edits
    // ========================================================================

    /// Delete the annotation at `position` on the active photo.
    pub fn delete_annotation(&mut self, position: usize) -> Option<EditorEvent> {
        let event = self
            .editor
            .delete_annotation(&mut self.project, &mut self.undo, position)?;
        self.committed(true);
        Some(event)
    }

    /// Start editing the label of `id`, remembering its current value.
    pub fn begin_label_edit(&mut self, id: AnnotationId) -> bool {
        let Some(label) = self
            .editor
            .active_photo()
            .and_then(|photo| self.project.annotation(photo, id))
            .map(|a| a.label.clone())
        else {
            return false;
        };
        self.label_edit = Some(LabelEdit {
            id,
            original: label,
        });
        true
    }

    /// Live keystroke in the label editor. Never logged.
    pub fn set_label_live(&mut self, text: &str) -> bool {
        match &self.label_edit {
            Some(edit) => self.editor.set_label_live(&mut self.project, edit.id, text),
            None => false,
        }
    }

    /// Commit the label edit as one undo step.
    pub fn end_label_edit(&mut self, text: &str) -> Option<EditorEvent> {
        let edit = self.label_edit.take()?;
        let event = self.editor.rename_annotation(
            &mut self.project,
            &mut self.undo,
            edit.id,
            &edit.original,
            text,
        )?;
        self.committed(true);
        Some(event)
    }

    /// Ranked label guesses for an annotation on the active photo.
    ///
    /// Empty when no classifier is attached or the photo cannot be read.
    pub fn suggest_labels(&self, id: AnnotationId) -> Vec<String> {
        let Some(classifier) = &self.classifier else {
            return Vec::new();
        };
        let Some(object) = self.editor.active_photo().and_then(|p| self.project.photo(p)) else {
            return Vec::new();
        };
        let Some(annotation) = object.get(id) else {
            return Vec::new();
        };
        let Some(bytes) = self.document.photo_bytes(object, false) else {
            return Vec::new();
        };
        match crop_region(&bytes, annotation.rect()) {
            Ok(Some(region)) => classifier.classify(&region),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Cannot crop '{}' for suggestions: {}", object.filename, e);
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Labels
    // ========================================================================

    /// Rename a label everywhere, as one undo step.
    pub fn rename_label(&mut self, old: &str, new: &str) -> Result<(), LabelError> {
        let new = new.trim();
        if old == new {
            return Ok(());
        }
        self.project.mass_rename(old, new)?;
        self.undo
            .push_command(commands::rename_label(old.to_string(), new.to_string()));
        self.committed(true);
        Ok(())
    }

    /// Add a custom label with a generated unique name.
    pub fn add_custom_label(&mut self) -> String {
        let name = self.project.add_custom_label();
        let index = self.project.custom_labels.len() - 1;
        self.undo
            .push_command(commands::add_custom_label(index, name.clone()));
        self.committed(true);
        name
    }

    /// Remove the custom label at `index`. Annotations keep their labels.
    pub fn remove_custom_label(&mut self, index: usize) -> Option<String> {
        let name = self.project.remove_custom_label(index)?;
        self.undo
            .push_command(commands::remove_custom_label(index, name.clone()));
        self.committed(true);
        Some(name)
    }

    // ========================================================================
    // Photos
    // ========================================================================

    /// Start importing photos at `at` (clamped to the photo count).
    ///
    /// Everything imported until [`Session::finish_import`] undoes as one
    /// step. Stopping early keeps what was imported so far.
    pub fn begin_import(&mut self, at: usize) {
        if self.import.is_some() {
            self.finish_import();
        }
        let cursor = at.min(self.project.objects.len());
        self.undo.begin_group(commands::IMPORT_PHOTOS);
        self.import = Some(ImportBatch {
            cursor,
            imported: 0,
        });
    }

    /// Add one photo. Outside an import batch it is appended and logged on
    /// its own.
    pub fn import_photo(&mut self, filename: impl Into<String>, real_size: Option<Size>) -> PhotoId {
        let mut photo = self.project.new_photo(filename);
        photo.real_size = real_size;
        let id = photo.id;

        let index = match self.import.as_mut() {
            Some(batch) => {
                let index = batch.cursor;
                batch.cursor += 1;
                batch.imported += 1;
                index
            }
            None => self.project.objects.len(),
        };
        log::debug!("📥 Imported '{}' at {}", photo.filename, index);
        self.project.insert_photo(index, photo.clone());
        self.undo
            .push_command(commands::import_photo(index, photo));

        if self.import.is_none() {
            self.committed(false);
            self.document.project_changed();
        }
        id
    }

    /// Close the current import batch.
    pub fn finish_import(&mut self) {
        let Some(batch) = self.import.take() else {
            return;
        };
        self.undo.end_group();
        if batch.imported > 0 {
            log::info!("Imported {} photos", batch.imported);
            self.committed(false);
            self.document.project_changed();
        }
    }

    /// Remove the photo at `index` with its annotations.
    pub fn remove_photo(&mut self, index: usize) -> Option<PhotoId> {
        let id = self.project.objects.get(index)?.id;
        if self.editor.active_photo() == Some(id) {
            self.editor.deactivate(&mut self.project);
            self.label_edit = None;
        }
        let (index, photo) = self.project.remove_photo(id)?;
        log::debug!("🗑️ Removed photo '{}'", photo.filename);
        self.undo.push_command(commands::remove(index, photo));
        self.committed(true);
        Some(id)
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.step(true)
    }

    pub fn redo(&mut self) -> bool {
        self.step(false)
    }

    fn step(&mut self, backwards: bool) -> bool {
        self.finish_import();
        self.editor.abandon(&mut self.project);
        self.label_edit = None;

        let done = if backwards {
            self.undo.undo(&mut self.project)
        } else {
            self.undo.redo(&mut self.project)
        };
        if !done {
            return false;
        }

        self.editor.validate(&mut self.project);
        self.document.mark(if backwards {
            ChangeKind::Undone
        } else {
            ChangeKind::Redone
        });
        self.request_reindex();
        self.document.project_changed();
        true
    }
}

/// Pixel size of encoded image bytes, without decoding the pixels.
fn read_dimensions(bytes: &[u8]) -> Option<Size> {
    let reader = match image::ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("Cannot read image header: {}", e);
            return None;
        }
    };
    match reader.into_dimensions() {
        Ok((width, height)) => Some(Size::new(width as f32, height as f32)),
        Err(e) => {
            log::warn!("Cannot read image dimensions: {}", e);
            None
        }
    }
}
