//! Turi Create CSV manifest.
//!
//! One `path,annotations` row per photo. Turi Create wants box centres in the
//! photo's real pixel space, while annotations are stored relative to the
//! display size, so every box is remapped:
//!
//! ```text
//! sx = real_w / display_w         cx = (real_w - display_w) / 2
//! x' = ((x + w / 2) - cx) * sx    width' = w * sx
//! ```
//!
//! and the same for `y`/`height`. The annotations column is compact JSON and
//! is written unquoted.

use crate::format::error::FormatError;
use crate::format::formats::createml::{Coordinates, ManifestAnnotation};
use crate::format::traits::{ManifestFormat, photo_path};
use crate::geometry::Size;
use crate::model::{Annotation, PhotoAnnotation, Project};

/// Header row of the CSV manifest.
pub const HEADER: &str = "path,annotations";

/// Remap one annotation from display space to centred real-pixel space.
pub fn remap(annotation: &Annotation, real: Size, display: Size) -> Coordinates {
    let sw = real.width / display.width;
    let sh = real.height / display.height;
    let cw = (real.width - display.width) / 2.0;
    let ch = (real.height - display.height) / 2.0;

    let w = annotation.w;
    let h = annotation.h;
    Coordinates {
        x: ((annotation.x + (w / 2.0)) - cw) * sw,
        y: ((annotation.y + (h / 2.0)) - ch) * sh,
        width: w * sw,
        height: h * sh,
    }
}

/// Build the CSV row for one photo.
pub fn row(object: &PhotoAnnotation) -> Result<String, FormatError> {
    let (Some(real), Some(display)) = (object.real_size, object.display_size) else {
        return Err(FormatError::missing_dimensions("turi", &object.filename));
    };
    let annotations: Vec<ManifestAnnotation> = object
        .annotations
        .iter()
        .map(|a| ManifestAnnotation {
            label: a.label.clone(),
            coordinates: remap(a, real, display),
        })
        .collect();
    let json = serde_json::to_string(&annotations)?;
    Ok(format!("{},{}", photo_path(&object.filename), json))
}

/// Build the whole CSV manifest.
pub fn manifest_csv(project: &Project) -> Result<String, FormatError> {
    let mut lines = vec![HEADER.to_string()];
    for object in &project.objects {
        lines.push(row(object)?);
    }
    Ok(lines.join("\n"))
}

/// Turi Create object-detection format (`annotations.csv`).
pub struct TuriFormat;

impl ManifestFormat for TuriFormat {
    fn id(&self) -> &'static str {
        "turi"
    }

    fn display_name(&self) -> &'static str {
        "Turi Create (CSV)"
    }

    fn manifest_name(&self) -> &'static str {
        "annotations.csv"
    }

    fn render(&self, project: &Project) -> Result<String, FormatError> {
        manifest_csv(project)
    }
}
