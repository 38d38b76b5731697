//! Project file persistence.
//!
//! A project is saved as a single JSON document holding the photo list (with
//! annotations and cached sizes) and the custom labels. Detected labels are
//! not stored; they are recomputed after loading.
//!
//! # Versioning
//!
//! Files carry a `MAJOR.MINOR.PATCH` version. While the major version is 0
//! the layout may change with any minor bump, so only the same minor version
//! is read. From 1.0 on, any file with the same major version is read.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::model::{PhotoAnnotation, Project};

/// A parsed `MAJOR.MINOR.PATCH` file version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FileVersion {
    pub const CURRENT: Self = Self {
        major: 0,
        minor: 1,
        patch: 0,
    };

    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split('.').map(|p| p.parse::<u32>().ok());
        let version = Self {
            major: parts.next()??,
            minor: parts.next()??,
            patch: parts.next()??,
        };
        parts.next().is_none().then_some(version)
    }

    /// Whether a file written at `self` can be read by this build.
    pub fn is_readable(&self) -> bool {
        match Self::CURRENT.major {
            0 => self.major == 0 && self.minor == Self::CURRENT.minor,
            major => self.major == major,
        }
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// On-disk representation of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Format version for compatibility checking.
    pub version: String,

    /// Photos with their annotations, in table order.
    #[serde(default)]
    pub objects: Vec<PhotoAnnotation>,

    /// User-declared labels.
    #[serde(default)]
    pub custom_labels: Vec<String>,
}

impl ProjectFile {
    /// Version string written by this build.
    pub const CURRENT_VERSION: &'static str = "0.1.0";

    /// Snapshot the persistent parts of `project`.
    pub fn from_project(project: &Project) -> Self {
        Self {
            version: FileVersion::CURRENT.to_string(),
            objects: project.objects.clone(),
            custom_labels: project.custom_labels.clone(),
        }
    }

    /// Build a project from this file. Detected labels start empty.
    pub fn into_project(self) -> Project {
        Project::from_parts(self.objects, self.custom_labels)
    }

    /// Check that photo ids and annotation ids are each unique.
    pub fn validate(&self) -> Result<(), FormatError> {
        let mut photos = HashSet::new();
        let mut annotations = HashSet::new();
        for object in &self.objects {
            if !is_plain_filename(&object.filename) {
                return Err(FormatError::invalid_project(format!(
                    "photo {} has filename '{}', expected a bare file name",
                    object.id, object.filename
                )));
            }
            if !photos.insert(object.id) {
                return Err(FormatError::invalid_project(format!(
                    "photo id {} is used twice",
                    object.id
                )));
            }
            for annotation in &object.annotations {
                if !annotations.insert(annotation.id) {
                    return Err(FormatError::invalid_project(format!(
                        "annotation id {} is used twice ('{}')",
                        annotation.id, object.filename
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parse, version-check and validate a project file.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let file: Self = serde_json::from_str(json)?;
        let readable = FileVersion::parse(&file.version).is_some_and(|v| v.is_readable());
        if !readable {
            return Err(FormatError::VersionMismatch {
                expected: Self::CURRENT_VERSION.to_string(),
                found: file.version,
            });
        }
        file.validate()?;
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let json = std::fs::read_to_string(path)?;
        let file = Self::from_json(&json)?;
        log::info!(
            "Loaded project {:?}: {} photos, {} custom labels",
            path,
            file.objects.len(),
            file.custom_labels.len()
        );
        Ok(file)
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), FormatError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved project to {:?}", path);
        Ok(())
    }
}

/// Photos are stored next to the project file, so a filename must not
/// reach outside that directory.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
