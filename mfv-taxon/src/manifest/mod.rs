//! Manifest rows and their loading
//!
//! - [`entry`] - per-row model and diagnostic wording
//! - [`loader`] - delimited-text manifest reader

pub mod entry;
pub mod loader;

pub use entry::{ErrorKind, ManifestEntry, QueryKey};
pub use loader::{load_manifest, load_workbook, parse_manifest, ManifestError, ManifestFormat};
