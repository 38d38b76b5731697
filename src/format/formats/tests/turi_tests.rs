//! Tests for the Turi Create CSV manifest.

use super::{create_test_project, photo_without_sizes};
use crate::format::error::FormatError;
use crate::format::formats::TuriFormat;
use crate::format::turi::{HEADER, manifest_csv, remap, row};
use crate::format::traits::ManifestFormat;
use crate::geometry::{Rect, Size};
use crate::model::{Annotation, Project};

#[test]
fn test_turi_format_metadata() {
    let format = TuriFormat;
    assert_eq!(format.id(), "turi");
    assert_eq!(format.display_name(), "Turi Create (CSV)");
    assert_eq!(format.manifest_name(), "annotations.csv");
}

#[test]
fn test_remap_matches_formula_bit_for_bit() {
    let real = Size::new(4032.0, 3024.0);
    let display = Size::new(733.0, 549.75);
    let annotation = Annotation::new(1, Rect::new(123.25, 45.5, 210.125, 99.0));

    let sx = real.width / display.width;
    let sy = real.height / display.height;
    let cx = (real.width - display.width) / 2.0;
    let cy = (real.height - display.height) / 2.0;

    let c = remap(&annotation, real, display);
    assert_eq!(c.x.to_bits(), (((123.25 + (210.125 / 2.0)) - cx) * sx).to_bits());
    assert_eq!(c.y.to_bits(), (((45.5 + (99.0 / 2.0)) - cy) * sy).to_bits());
    assert_eq!(c.width.to_bits(), (210.125 * sx).to_bits());
    assert_eq!(c.height.to_bits(), (99.0 * sy).to_bits());
}

#[test]
fn test_remap_same_size_is_centre() {
    let size = Size::new(640.0, 480.0);
    let annotation = Annotation::new(1, Rect::new(10.0, 20.0, 30.0, 40.0));
    let c = remap(&annotation, size, size);
    assert_eq!((c.x, c.y, c.width, c.height), (25.0, 40.0, 30.0, 40.0));
}

#[test]
fn test_manifest_csv_text() {
    let csv = manifest_csv(&create_test_project()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER);
    assert_eq!(
        lines[1],
        "Photos/cat.jpg,[\
         {\"label\":\"cat\",\"coordinates\":{\"x\":-400.0,\"y\":-250.0,\"width\":400.0,\"height\":300.0}},\
         {\"label\":\"No Label\",\"coordinates\":{\"x\":-750.0,\"y\":-550.0,\"width\":100.0,\"height\":100.0}}]"
    );
    assert_eq!(lines[2], "Photos/empty.png,[]");
    assert!(!csv.ends_with('\n'));
}

#[test]
fn test_missing_dimensions_rejected() {
    let mut project = Project::new();
    project.objects.push(photo_without_sizes(7));

    match manifest_csv(&project) {
        Err(FormatError::MissingDimensions { format, image }) => {
            assert_eq!(format, "turi");
            assert_eq!(image, "unsized.jpg");
        }
        other => panic!("expected MissingDimensions, got {:?}", other),
    }
    assert!(row(&project.objects[0]).is_err());
}

#[test]
fn test_empty_project_is_header_only() {
    assert_eq!(manifest_csv(&Project::new()).unwrap(), HEADER);
}
