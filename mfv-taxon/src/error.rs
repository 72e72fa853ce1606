//! Error types for mfv-taxon
//!
//! Row-level problems (missing fields, mismatches) are not errors here; they
//! are collected as report lines. Everything in this module aborts the run.

use crate::manifest::ManifestError;
use crate::registry::RegistryError;
use thiserror::Error;

/// Fatal validator error
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Registry unreachable or returned an unusable response
    #[error("Registry failure: {0}")]
    Registry(#[from] RegistryError),

    /// Manifest could not be read
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Result type for validator operations
pub type ValidatorResult<T> = Result<T, ValidatorError>;
