//! Label bookkeeping: detected-label indexing, mass rename and custom labels.
//!
//! Detected labels are derived from annotation usage and recomputed in the
//! background by [`LabelRegistry`]. Custom labels are declared by the user and
//! live independently of usage. A label string never appears in both lists.

mod registry;

pub use registry::{LabelRegistry, LabelSnapshot};

use std::collections::HashMap;

use thiserror::Error;

use crate::constants::NO_LABEL;
use crate::model::{PhotoAnnotation, Project};

/// Errors from label validation. All are raised before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("label '{0}' already exists")]
    Duplicate(String),

    #[error("label '{0}' is not in use")]
    NotFound(String),

    #[error("label must not be empty")]
    Empty,

    #[error("'{0}' is reserved for unlabeled annotations")]
    Reserved(String),
}

/// Collect the distinct labels in use, in first-seen order.
///
/// Skips the empty string, the `"No Label"` sentinel and anything already
/// declared as a custom label.
pub fn index_labels(objects: &[PhotoAnnotation], custom_labels: &[String]) -> Vec<String> {
    let mut detected: Vec<String> = Vec::new();
    for annotation in objects.iter().flat_map(|o| o.annotations.iter()) {
        if !annotation.has_meaningful_label() {
            continue;
        }
        let label = &annotation.label;
        if custom_labels.contains(label) || detected.contains(label) {
            continue;
        }
        detected.push(label.clone());
    }
    detected
}

/// Count how many annotations use each of `labels`.
///
/// Labels with no usage are reported with a count of zero.
pub fn label_tally(objects: &[PhotoAnnotation], labels: &[String]) -> HashMap<String, usize> {
    let mut tally: HashMap<String, usize> = labels.iter().map(|l| (l.clone(), 0)).collect();
    for annotation in objects.iter().flat_map(|o| o.annotations.iter()) {
        if let Some(count) = tally.get_mut(&annotation.label) {
            *count += 1;
        }
    }
    tally
}

/// Check a candidate label name, trimming surrounding whitespace.
pub fn validate_label(name: &str) -> Result<&str, LabelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LabelError::Empty);
    }
    if name == NO_LABEL {
        return Err(LabelError::Reserved(name.to_string()));
    }
    Ok(name)
}

impl Project {
    /// Rename `old` to `new` on every annotation and in whichever label list
    /// holds `old`, keeping its position.
    ///
    /// Renaming a label to itself is a no-op. A `new` name that already
    /// exists anywhere in [`Project::all_labels`] is rejected without touching
    /// the project.
    pub fn mass_rename(&mut self, old: &str, new: &str) -> Result<(), LabelError> {
        if old == new {
            return Ok(());
        }
        let new = validate_label(new)?;
        if old == new {
            return Ok(());
        }
        if old == NO_LABEL {
            return Err(LabelError::Reserved(old.to_string()));
        }
        if self.has_label(new) {
            return Err(LabelError::Duplicate(new.to_string()));
        }

        if !self.label_in_use(old) && !self.has_label(old) {
            return Err(LabelError::NotFound(old.to_string()));
        }

        self.apply_rename(old, new);
        Ok(())
    }

    /// Rename `old` to `new` without validation.
    ///
    /// Undo and redo replay through here: the detected list may lag behind
    /// the annotations until the next reindex, so it cannot be trusted to
    /// reject a name. A list slot holding `old` takes `new`, unless `new` is
    /// already listed, in which case the slot is dropped.
    pub fn apply_rename(&mut self, old: &str, new: &str) {
        let mut renamed = 0;
        for annotation in self.objects.iter_mut().flat_map(|o| o.annotations.iter_mut()) {
            if annotation.label == old {
                annotation.label = new.to_string();
                renamed += 1;
            }
        }

        let listed = self.has_label(new);
        for list in [&mut self.labels, &mut self.custom_labels] {
            let Some(index) = list.iter().position(|l| l == old) else {
                continue;
            };
            if listed {
                list.remove(index);
            } else {
                list[index] = new.to_string();
            }
            break;
        }

        log::debug!("🏷️ Renamed label '{}' -> '{}' on {} annotations", old, new, renamed);
    }

    /// Append a new custom label with a unique generated name.
    pub fn add_custom_label(&mut self) -> String {
        let name = self.next_custom_label_name();
        self.custom_labels.push(name.clone());
        name
    }
}
