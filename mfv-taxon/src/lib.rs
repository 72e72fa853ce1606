//! mfv-taxon library interface
//!
//! Checks that every manifest row declares a common name and a taxonomy
//! identifier that refer to the same organism in the NCBI taxonomy.
//!
//! Data flow: [`manifest::load_manifest`] → [`reconcile::Reconciler`]
//! (consulting a [`registry::TaxonomyLookup`]) → [`report::ValidationReport`].

pub mod error;
pub mod manifest;
pub mod reconcile;
pub mod registry;
pub mod report;

pub use crate::error::{ValidatorError, ValidatorResult};
pub use crate::manifest::{load_manifest, ManifestEntry};
pub use crate::reconcile::Reconciler;
pub use crate::registry::{NcbiClient, RateLimitedRegistry, TaxonSummary, TaxonomyLookup};
pub use crate::report::ValidationReport;
