//! Reconciliation engine
//!
//! Walks manifest entries in order and decides, for each declared
//! (common name, taxon ID) pair, whether the registry corroborates it.
//!
//! # Per-entry decision
//! 1. **Missing data**: a missing field is reported without any registry call
//! 2. **Memo**: a pair seen earlier in the run reuses the earlier outcome
//! 3. **Resolve by id**: look up the canonical name and rank for the taxon ID;
//!    a rank coarser than genus adds an advisory line
//! 4. **Fast accept**: canonical name equal to the declared name → no error
//! 5. **Resolve by name**: look up the taxon ID for the declared name
//! 6. **Classify** (first match wins):
//!    - declared ID equals the ID the name resolves to → imprecise match
//!    - both lookups resolved → name/id mismatch
//!    - otherwise → unresolved
//!
//! Row-level problems are collected; only a [`RegistryError`] stops the run.

use crate::error::ValidatorResult;
use crate::manifest::entry::{error_body, is_accepted_rank, rank_advisory};
use crate::manifest::{load_manifest, ErrorKind, ManifestEntry, QueryKey};
use crate::registry::{RegistryError, TaxonomyLookup};
use crate::report::ValidationReport;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Result of reconciling one unique declared pair
///
/// Created once per [`QueryKey`] and reused for every later entry sharing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    /// `None` when name and id agree
    pub error_kind: Option<ErrorKind>,
    /// Canonical name the registry reports for the declared id
    pub registry_name_for_id: Option<String>,
    /// Id the registry reports for the declared name (only looked up on disagreement)
    pub registry_id_for_name: Option<String>,
    /// Rank reported for the declared id
    pub rank: Option<String>,
    /// Advisory body when the rank is too coarse
    pub rank_advisory: Option<String>,
    /// Error body (without sample attribution) when `error_kind` is set
    pub error_body: Option<String>,
}

impl ReconciliationOutcome {
    pub fn is_consistent(&self) -> bool {
        self.error_kind.is_none()
    }

    /// Report lines for `entry`: rank advisory first, then the error
    pub fn lines_for(&self, entry: &ManifestEntry) -> Vec<String> {
        self.rank_advisory
            .iter()
            .chain(self.error_body.iter())
            .map(|body| entry.attribute(body))
            .collect()
    }
}

/// Classify a disagreement between the declared pair and the registry
pub fn classify(
    declared_taxon_id: &str,
    registry_name_for_id: Option<&str>,
    registry_id_for_name: Option<&str>,
) -> ErrorKind {
    if registry_id_for_name == Some(declared_taxon_id) {
        ErrorKind::ImpreciseMatch
    } else if registry_name_for_id.is_some() && registry_id_for_name.is_some() {
        ErrorKind::NameIdMismatch
    } else {
        ErrorKind::Unresolved
    }
}

/// Sequential, memoizing validator over a registry
pub struct Reconciler<R> {
    registry: R,
    outcomes: HashMap<QueryKey, ReconciliationOutcome>,
}

impl<R: TaxonomyLookup> Reconciler<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            outcomes: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Memoized outcome for a declared pair, if already reconciled
    pub fn outcome(&self, key: &QueryKey) -> Option<&ReconciliationOutcome> {
        self.outcomes.get(key)
    }

    /// Number of unique pairs reconciled so far
    pub fn unique_pairs(&self) -> usize {
        self.outcomes.len()
    }

    /// Validate entries in order, returning every error line
    pub async fn verify_entries<I>(&mut self, entries: I) -> Result<Vec<String>, RegistryError>
    where
        I: IntoIterator<Item = ManifestEntry>,
    {
        let mut error_list = Vec::new();
        let mut checked = 0usize;

        for entry in entries {
            error_list.extend(self.verify_entry(&entry).await?);
            checked += 1;
        }

        info!(
            entries = checked,
            unique_pairs = self.outcomes.len(),
            errors = error_list.len(),
            "Manifest reconciliation complete"
        );

        Ok(error_list)
    }

    /// Validate a single entry, returning its error lines (empty when valid)
    pub async fn verify_entry(&mut self, entry: &ManifestEntry) -> Result<Vec<String>, RegistryError> {
        let Some(key) = entry.query_key() else {
            debug!(sample_id = %entry.sample_id, "Entry missing required field");
            return Ok(entry.missing_field_error().into_iter().collect());
        };

        if let Some(outcome) = self.outcomes.get(&key) {
            debug!(
                sample_id = %entry.sample_id,
                common_name = %key.common_name,
                taxon_id = %key.taxon_id,
                "Reusing outcome for previously seen pair"
            );
            return Ok(outcome.lines_for(entry));
        }

        let outcome = self.resolve(entry, &key).await?;
        let lines = outcome.lines_for(entry);
        self.outcomes.insert(key, outcome);
        Ok(lines)
    }

    /// First encounter of a pair: consult the registry
    async fn resolve(
        &self,
        entry: &ManifestEntry,
        key: &QueryKey,
    ) -> Result<ReconciliationOutcome, RegistryError> {
        let summary = self.registry.lookup_name_for_id(&key.taxon_id).await?;
        let (registry_name_for_id, rank) = match summary {
            Some(s) => (Some(s.scientific_name), s.rank),
            None => (None, None),
        };

        let advisory = match rank.as_deref() {
            Some(r) if !is_accepted_rank(Some(r)) => Some(rank_advisory(r)),
            _ => None,
        };

        if registry_name_for_id.as_deref() == Some(key.common_name.as_str()) {
            debug!(
                sample_id = %entry.sample_id,
                taxon_id = %key.taxon_id,
                "Declared name matches registry name"
            );
            return Ok(ReconciliationOutcome {
                error_kind: None,
                registry_name_for_id,
                registry_id_for_name: None,
                rank,
                rank_advisory: advisory,
                error_body: None,
            });
        }

        let registry_id_for_name = self.registry.lookup_id_for_name(&key.common_name).await?;
        let kind = classify(
            &key.taxon_id,
            registry_name_for_id.as_deref(),
            registry_id_for_name.as_deref(),
        );

        let body = error_body(
            kind,
            &entry.common_name_statement(registry_id_for_name.as_deref()),
            &entry.taxon_id_statement(registry_name_for_id.as_deref()),
        );

        debug!(
            sample_id = %entry.sample_id,
            kind = ?kind,
            registry_name = ?registry_name_for_id,
            registry_id = ?registry_id_for_name,
            "Declared pair not corroborated"
        );

        Ok(ReconciliationOutcome {
            error_kind: Some(kind),
            registry_name_for_id,
            registry_id_for_name,
            rank,
            rank_advisory: advisory,
            error_body: Some(body),
        })
    }
}

/// Validate a manifest with a fresh engine and render the report
pub async fn validate_entries<R, I>(registry: R, entries: I) -> Result<ValidationReport, RegistryError>
where
    R: TaxonomyLookup,
    I: IntoIterator<Item = ManifestEntry>,
{
    let mut reconciler = Reconciler::new(registry);
    let errors = reconciler.verify_entries(entries).await?;
    Ok(ValidationReport::new(errors))
}

/// Load a manifest file and validate it
///
/// Fails only when the manifest cannot be read or the registry is unusable.
pub async fn validate_manifest<R: TaxonomyLookup>(
    path: &Path,
    registry: R,
) -> ValidatorResult<ValidationReport> {
    let entries = load_manifest(path)?;
    Ok(validate_entries(registry, entries).await?)
}
