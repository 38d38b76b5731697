//! Errors from loading, saving and exporting projects.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but its contents are inconsistent.
    #[error("Invalid project: {message}")]
    InvalidProject { message: String },

    /// A photo listed in the project is missing from the photos folder.
    #[error("Photo not found: {path:?}")]
    ImageNotFound { path: PathBuf },

    /// The project file was written by an incompatible version.
    #[error("Unsupported project version {found} (this build reads {expected})")]
    VersionMismatch { expected: String, found: String },

    /// The manifest needs a photo's real and display sizes, and one is unknown.
    #[error("'{format}' export needs the pixel size of '{image}'; open the photo once first")]
    MissingDimensions { format: String, image: String },

    #[error("No export format named '{0}'")]
    UnknownFormat(String),
}

impl FormatError {
    pub fn invalid_project(message: impl Into<String>) -> Self {
        Self::InvalidProject {
            message: message.into(),
        }
    }

    pub fn missing_dimensions(format: impl Into<String>, image: impl Into<String>) -> Self {
        Self::MissingDimensions {
            format: format.into(),
            image: image.into(),
        }
    }
}
