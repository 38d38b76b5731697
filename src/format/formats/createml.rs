//! Create ML JSON manifest.
//!
//! One record per photo, with annotation coordinates exactly as stored:
//!
//! ```json
//! [{"image": "Photos/a.jpg",
//!   "annotations": [{"label": "cat",
//!                    "coordinates": {"x": 10, "y": 20, "width": 30, "height": 40}}]}]
//! ```

use serde::Serialize;

use crate::format::error::FormatError;
use crate::format::traits::{ManifestFormat, photo_path};
use crate::model::{Annotation, Project};

/// Box coordinates as written to a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&Annotation> for Coordinates {
    fn from(annotation: &Annotation) -> Self {
        Self {
            x: annotation.x,
            y: annotation.y,
            width: annotation.w,
            height: annotation.h,
        }
    }
}

/// One labeled box in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestAnnotation {
    pub label: String,
    pub coordinates: Coordinates,
}

/// One photo in a Create ML manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    pub image: String,
    pub annotations: Vec<ManifestAnnotation>,
}

/// Build the Create ML records for every photo, in table order.
pub fn manifest(project: &Project) -> Vec<ImageRecord> {
    project
        .objects
        .iter()
        .map(|object| ImageRecord {
            image: photo_path(&object.filename),
            annotations: object
                .annotations
                .iter()
                .map(|a| ManifestAnnotation {
                    label: a.label.clone(),
                    coordinates: Coordinates::from(a),
                })
                .collect(),
        })
        .collect()
}

/// Create ML object-detection format (`annotations.json`).
pub struct CreateMlFormat;

impl ManifestFormat for CreateMlFormat {
    fn id(&self) -> &'static str {
        "createml"
    }

    fn display_name(&self) -> &'static str {
        "Create ML (JSON)"
    }

    fn manifest_name(&self) -> &'static str {
        "annotations.json"
    }

    fn render(&self, project: &Project) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(&manifest(project))?)
    }
}
