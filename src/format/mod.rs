//! Project persistence and training-dataset export.
//!
//! Projects are saved as versioned JSON ([`ProjectFile`]). Exports produce a
//! directory with a `Photos/` folder and one manifest, in one of the
//! registered [`ManifestFormat`]s:
//!
//! - **Create ML JSON**: one record per photo, coordinates as stored
//! - **Turi Create CSV**: one row per photo, box centres remapped to the
//!   photo's real pixel size
//!
//! ## Usage
//!
//! ```rust,ignore
//! use annotate_ml::format::{ExportOptions, FormatRegistry};
//!
//! let registry = FormatRegistry::new();
//! let format = registry.require("turi")?;
//! format.export(&project, out_dir, &ExportOptions::new().photos_source(photos))?;
//! ```

mod error;
pub mod formats;
mod project;
mod registry;
mod traits;

pub use error::FormatError;
pub use formats::{createml, turi};
pub use project::{FileVersion, ProjectFile};
pub use registry::FormatRegistry;
pub use traits::{ExportOptions, ExportResult, ManifestFormat, PHOTOS_DIR, photo_path};
