//! The document collaborator.
//!
//! The core never touches photo storage or dirty-flag bookkeeping directly.
//! A [`Document`] implementation hands out image bytes and receives change
//! notifications; the [`Session`](crate::session::Session) calls it.

use std::path::{Path, PathBuf};

use crate::format::PHOTOS_DIR;
use crate::model::PhotoAnnotation;

/// Kind of change reported for the dirty flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A new mutation was committed.
    Done,
    /// A mutation was undone.
    Undone,
    /// A mutation was redone.
    Redone,
}

/// Storage and change-tracking for one open project.
pub trait Document {
    /// Image bytes for `photo`, or its thumbnail. `None` if unavailable.
    fn photo_bytes(&self, photo: &PhotoAnnotation, thumbnail: bool) -> Option<Vec<u8>>;

    /// Update the dirty flag.
    fn mark(&mut self, change: ChangeKind);

    /// The project finished loading and the core state is ready.
    fn project_did_load(&mut self) {}

    /// Project contents changed (photos or labels), for observers.
    fn project_changed(&mut self) {}
}

/// A [`Document`] backed by a project folder with a `Photos/` directory.
///
/// Thumbnails are not stored separately; the full image is returned.
#[derive(Debug, Clone)]
pub struct FolderDocument {
    root: PathBuf,
    /// Net number of unsaved changes; zero means clean.
    change_count: i64,
}

impl FolderDocument {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            change_count: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.root.join(PHOTOS_DIR)
    }

    pub fn is_dirty(&self) -> bool {
        self.change_count != 0
    }

    /// Mark the current state as saved.
    pub fn mark_saved(&mut self) {
        self.change_count = 0;
    }
}

impl Document for FolderDocument {
    fn photo_bytes(&self, photo: &PhotoAnnotation, _thumbnail: bool) -> Option<Vec<u8>> {
        let path = self.photos_dir().join(&photo.filename);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("Failed to read photo {:?}: {}", path, e);
                None
            }
        }
    }

    fn mark(&mut self, change: ChangeKind) {
        match change {
            ChangeKind::Done | ChangeKind::Redone => self.change_count += 1,
            ChangeKind::Undone => self.change_count -= 1,
        }
    }

    fn project_did_load(&mut self) {
        self.change_count = 0;
        log::info!("Project loaded from {:?}", self.root);
    }
}
