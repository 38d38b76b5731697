//! Trait definitions for manifest exporters.

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::model::Project;

/// Directory exported photos are copied into, relative to the export root.
/// Manifest image paths use the same prefix.
pub const PHOTOS_DIR: &str = "Photos";

/// Manifest path of a photo inside an export.
pub fn photo_path(filename: &str) -> String {
    format!("{}/{}", PHOTOS_DIR, filename)
}

/// A training-dataset manifest format.
///
/// An export directory holds the manifest file plus a `Photos/` folder with
/// every project photo. Implementations only render the manifest text; the
/// shared [`ManifestFormat::export`] writes it and copies the photos.
pub trait ManifestFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "createml", "turi").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File name of the manifest inside the export directory.
    fn manifest_name(&self) -> &'static str;

    /// Render the manifest for `project`.
    fn render(&self, project: &Project) -> Result<String, FormatError>;

    /// Write the manifest (and optionally the photos) into `dir`.
    fn export(
        &self,
        project: &Project,
        dir: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        log::info!("Exporting {} manifest to {:?}", self.display_name(), dir);
        let manifest = self.render(project)?;

        std::fs::create_dir_all(dir)?;
        let mut result = ExportResult::new();

        if let Some(source) = &options.photos_source {
            let photos_dir = dir.join(PHOTOS_DIR);
            std::fs::create_dir_all(&photos_dir)?;
            for object in &project.objects {
                let from = source.join(&object.filename);
                if !from.exists() {
                    return Err(FormatError::ImageNotFound { path: from });
                }
                let to = photos_dir.join(&object.filename);
                std::fs::copy(&from, &to)?;
                result.files_created.push(to);
            }
        }

        let manifest_path = dir.join(self.manifest_name());
        std::fs::write(&manifest_path, manifest)?;
        result.files_created.push(manifest_path);

        result.images_exported = project.objects.len();
        result.annotations_exported = project.annotation_count();
        log::info!(
            "Exported {} images with {} annotations",
            result.images_exported,
            result.annotations_exported
        );
        Ok(result)
    }
}

/// Options for export operations.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Folder holding the project's photo files. When set, every photo is
    /// copied into the export's `Photos/` folder.
    pub photos_source: Option<PathBuf>,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy photos from `path` into the export.
    pub fn photos_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.photos_source = Some(path.into());
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of images exported.
    pub images_exported: usize,

    /// Number of annotations exported.
    pub annotations_exported: usize,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new() -> Self {
        Self::default()
    }
}
