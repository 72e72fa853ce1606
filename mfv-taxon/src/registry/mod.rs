//! Taxonomy registry access
//!
//! [`TaxonomyLookup`] is the seam between the reconciliation engine and the
//! external registry. `Ok(None)` means "the registry could not resolve this";
//! `Err(RegistryError)` means the registry itself was unusable and the run
//! must stop.
//!
//! - [`NcbiClient`] - HTTP transport against NCBI E-utilities
//! - [`RateLimitedRegistry`] - throttling wrapper around any lookup

pub mod ncbi_client;
pub mod rate_limited;
pub mod rate_limiter;

pub use ncbi_client::NcbiClient;
pub use rate_limited::RateLimitedRegistry;
pub use rate_limiter::RateLimiter;

use async_trait::async_trait;
use thiserror::Error;

/// Registry transport errors
///
/// All variants are fatal for a validation run.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Registry record for a taxonomy identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonSummary {
    /// Canonical (scientific) name
    pub scientific_name: String,
    /// Taxonomic rank, `None` when the registry leaves it blank
    pub rank: Option<String>,
}

impl TaxonSummary {
    pub fn new(scientific_name: impl Into<String>, rank: Option<&str>) -> Self {
        Self {
            scientific_name: scientific_name.into(),
            rank: rank.map(str::to_string),
        }
    }
}

/// Name/id lookups against a taxonomy registry
///
/// Implementations conflate "no match" and "more than one match" into
/// `Ok(None)` for [`lookup_id_for_name`](TaxonomyLookup::lookup_id_for_name);
/// the engine relies on that.
#[async_trait]
pub trait TaxonomyLookup: Send + Sync {
    /// Resolve a name to an identifier, only when exactly one record matches
    async fn lookup_id_for_name(&self, name: &str) -> Result<Option<String>, RegistryError>;

    /// Resolve an identifier to its canonical name and rank
    async fn lookup_name_for_id(&self, taxon_id: &str)
        -> Result<Option<TaxonSummary>, RegistryError>;
}
