//! Annotate ML - bounding-box annotation core
//!
//! The framework-free heart of an object-detection dataset editor: photos
//! and their labeled boxes, a pointer-driven editing state machine, an undo
//! log, background label indexing, and Create ML / Turi Create exports.
//!
//! A view adapter drives a [`session::Session`], feeding it pointer events
//! in photo coordinates and rendering the state it exposes.

pub mod config;
pub mod constants;
pub mod document;
pub mod editor;
pub mod format;
pub mod geometry;
pub mod labels;
pub mod model;
pub mod session;
pub mod suggest;
pub mod undo;

pub use document::{ChangeKind, Document, FolderDocument};
pub use model::{Annotation, AnnotationId, PhotoAnnotation, PhotoId, Project};
pub use session::Session;
