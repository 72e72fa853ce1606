//! Rate-limited registry client
//!
//! Wraps any [`TaxonomyLookup`] so that at most one outbound lookup happens
//! per minimum interval, regardless of which lookup is invoked.

use super::{RateLimiter, RegistryError, TaxonSummary, TaxonomyLookup};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Throttling wrapper around a registry transport
///
/// Owns the single throttle timestamp for the run. Create one per run and
/// call it sequentially.
#[derive(Debug)]
pub struct RateLimitedRegistry<L> {
    inner: L,
    rate_limiter: RateLimiter,
}

impl<L: TaxonomyLookup> RateLimitedRegistry<L> {
    pub fn new(inner: L, min_interval: Duration) -> Self {
        Self {
            inner,
            rate_limiter: RateLimiter::new(min_interval),
        }
    }

    /// Wrapped transport
    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn min_interval(&self) -> Duration {
        self.rate_limiter.min_interval()
    }
}

#[async_trait]
impl<L: TaxonomyLookup> TaxonomyLookup for RateLimitedRegistry<L> {
    async fn lookup_id_for_name(&self, name: &str) -> Result<Option<String>, RegistryError> {
        self.rate_limiter.wait().await;
        let result = self.inner.lookup_id_for_name(name).await?;
        debug!(name = %name, taxon_id = ?result, "Registry name lookup complete");
        Ok(result)
    }

    async fn lookup_name_for_id(
        &self,
        taxon_id: &str,
    ) -> Result<Option<TaxonSummary>, RegistryError> {
        self.rate_limiter.wait().await;
        let result = self.inner.lookup_name_for_id(taxon_id).await?;
        debug!(
            taxon_id = %taxon_id,
            name = ?result.as_ref().map(|s| &s.scientific_name),
            rank = ?result.as_ref().and_then(|s| s.rank.as_ref()),
            "Registry id lookup complete"
        );
        Ok(result)
    }
}
