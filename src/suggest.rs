//! Label suggestions from an external image classifier.
//!
//! The classifier itself lives outside the core. The editor only supplies a
//! crop of the active photo and shows whatever ranked labels come back.

use image::{DynamicImage, ImageError};

use crate::geometry::Rect;

/// Ranked label guesses for an image region.
pub trait LabelClassifier {
    /// Best guess first. An empty list means no suggestion.
    fn classify(&self, region: &DynamicImage) -> Vec<String>;
}

/// Decode `bytes` and crop `rect` out of it, clamped to the image bounds.
///
/// Returns `Ok(None)` if the clamped region is empty.
pub fn crop_region(bytes: &[u8], rect: Rect) -> Result<Option<DynamicImage>, ImageError> {
    let image = image::load_from_memory(bytes)?;
    let r = rect.standardized();

    let (width, height) = (image.width() as f32, image.height() as f32);
    let x0 = r.x.clamp(0.0, width);
    let y0 = r.y.clamp(0.0, height);
    let x1 = (r.x + r.w).clamp(0.0, width);
    let y1 = (r.y + r.h).clamp(0.0, height);

    let w = (x1 - x0).floor() as u32;
    let h = (y1 - y0).floor() as u32;
    if w == 0 || h == 0 {
        return Ok(None);
    }
    Ok(Some(image.crop_imm(x0.floor() as u32, y0.floor() as u32, w, h)))
}
