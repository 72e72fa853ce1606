//! Shared test helpers: an in-memory taxonomy registry that records calls

#![allow(dead_code)]

use async_trait::async_trait;
use mfv_taxon::registry::RegistryError;
use mfv_taxon::{ManifestEntry, TaxonSummary, TaxonomyLookup};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::Instant;

/// Which lookup was invoked, and with what argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IdForName(String),
    NameForId(String),
}

/// In-memory registry
///
/// Unknown ids and names resolve to `None`; names registered more than once
/// also resolve to `None`, mirroring the "exactly one match" policy.
#[derive(Default)]
pub struct MockRegistry {
    summaries: HashMap<String, TaxonSummary>,
    ids_by_name: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<(Call, Instant)>>,
    unreachable: bool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an id with its canonical name and rank; the name resolves back to the id
    pub fn with_taxon(mut self, taxon_id: &str, name: &str, rank: &str) -> Self {
        let rank = if rank.is_empty() { None } else { Some(rank) };
        self.summaries
            .insert(taxon_id.to_string(), TaxonSummary::new(name, rank));
        self.with_name(name, taxon_id)
    }

    /// Register an additional name (synonym, common name) for an id
    pub fn with_name(mut self, name: &str, taxon_id: &str) -> Self {
        self.ids_by_name
            .entry(name.to_string())
            .or_default()
            .push(taxon_id.to_string());
        self
    }

    /// Every lookup fails with a network error
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: Call) -> Result<(), RegistryError> {
        self.calls.lock().unwrap().push((call, Instant::now()));
        if self.unreachable {
            return Err(RegistryError::NetworkError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaxonomyLookup for MockRegistry {
    async fn lookup_id_for_name(&self, name: &str) -> Result<Option<String>, RegistryError> {
        self.record(Call::IdForName(name.to_string()))?;
        Ok(match self.ids_by_name.get(name).map(Vec::as_slice) {
            Some([only]) => Some(only.clone()),
            _ => None,
        })
    }

    async fn lookup_name_for_id(
        &self,
        taxon_id: &str,
    ) -> Result<Option<TaxonSummary>, RegistryError> {
        self.record(Call::NameForId(taxon_id.to_string()))?;
        Ok(self.summaries.get(taxon_id).cloned())
    }
}

/// Shorthand for a fully declared entry
pub fn entry(sample_id: &str, common_name: &str, taxon_id: &str) -> ManifestEntry {
    ManifestEntry::new(sample_id, Some(common_name), Some(taxon_id))
}

/// Strip the leading `<sample_id>: ` attribution from a report line
pub fn body(line: &str) -> &str {
    line.split_once(": ").map(|(_, b)| b).unwrap_or(line)
}

/// Registry used by most scenarios
pub fn zebrafish_registry() -> MockRegistry {
    MockRegistry::new()
        .with_taxon("7955", "Danio rerio", "species")
        .with_taxon("5597", "Other species", "species")
        .with_taxon("7953", "Danio", "genus")
        .with_taxon("7952", "Cyprinidae", "family")
        .with_name("zebrafish", "7955")
}
