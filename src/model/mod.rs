//! Data models for the annotation core.

mod annotation;
mod photo;
mod project;

pub use annotation::{Annotation, AnnotationId};
pub use photo::{PhotoAnnotation, PhotoId};
pub use project::Project;
