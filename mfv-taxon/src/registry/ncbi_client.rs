//! NCBI Taxonomy client
//!
//! Queries NCBI E-utilities for the taxonomy database:
//! - `esearch` resolves a name (any name class) to taxonomy identifiers
//! - `esummary` resolves an identifier to its scientific name and rank
//!
//! This client performs no throttling of its own; wrap it in a
//! [`RateLimitedRegistry`](super::RateLimitedRegistry).
//!
//! # API Reference
//! - Endpoint: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/
//! - Rate Limit: 3 requests/second without an API key

use super::{RegistryError, TaxonSummary, TaxonomyLookup};
use async_trait::async_trait;
use mfv_common::config::RegistryConfig;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

const TAXONOMY_DB: &str = "taxonomy";

/// esearch response envelope
#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: Option<EsearchResult>,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// esummary response envelope
///
/// `result` mixes a `uids` array with one object per requested id.
#[derive(Debug, Deserialize)]
struct EsummaryResponse {
    result: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct EsummaryRecord {
    scientificname: Option<String>,
    rank: Option<String>,
}

/// NCBI E-utilities taxonomy client
pub struct NcbiClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    tool: Option<String>,
    email: Option<String>,
}

impl NcbiClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            tool: config.tool.clone(),
            email: config.email.clone(),
        })
    }

    /// URL for a name → id search
    pub fn esearch_url(&self, name: &str) -> Result<Url, RegistryError> {
        let mut params = vec![
            ("db", TAXONOMY_DB),
            ("field", "All Names"),
            ("term", name),
            ("retmode", "json"),
        ];
        params.extend(self.etiquette_params());
        self.build_url("esearch.fcgi", &params)
    }

    /// URL for an id → summary lookup
    pub fn esummary_url(&self, taxon_id: &str) -> Result<Url, RegistryError> {
        let mut params = vec![("db", TAXONOMY_DB), ("id", taxon_id), ("retmode", "json")];
        params.extend(self.etiquette_params());
        self.build_url("esummary.fcgi", &params)
    }

    fn etiquette_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.as_str()));
        }
        if let Some(tool) = &self.tool {
            params.push(("tool", tool.as_str()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.as_str()));
        }
        params
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, RegistryError> {
        Url::parse_with_params(&format!("{}/{}", self.base_url, endpoint), params)
            .map_err(|e| RegistryError::ParseError(format!("Invalid registry URL: {}", e)))
    }

    /// Execute a GET and decode the body as JSON
    ///
    /// Any failure here means the registry gave no usable response.
    async fn fetch_json(&self, url: Url) -> Result<Value, RegistryError> {
        debug!(url = %url, "Querying NCBI E-utilities");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                RegistryError::NetworkError(format!("Could not connect to NCBI database: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::ApiError(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| RegistryError::ParseError(format!("NCBI response is not JSON: {}", e)))
    }
}

/// Extract the identifier from an esearch body when exactly one record matched
pub fn parse_esearch(body: &Value) -> Option<String> {
    let response: EsearchResponse = serde_json::from_value(body.clone()).ok()?;
    match response.esearchresult?.idlist.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    }
}

/// Extract name and rank for `taxon_id` from an esummary body
pub fn parse_esummary(body: &Value, taxon_id: &str) -> Option<TaxonSummary> {
    let response: EsummaryResponse = serde_json::from_value(body.clone()).ok()?;
    let record_value = response.result?.remove(taxon_id)?;
    let record: EsummaryRecord = serde_json::from_value(record_value).ok()?;

    let scientific_name = record.scientificname.filter(|n| !n.trim().is_empty())?;
    let rank = record.rank.filter(|r| !r.trim().is_empty());

    Some(TaxonSummary {
        scientific_name,
        rank,
    })
}

#[async_trait]
impl TaxonomyLookup for NcbiClient {
    async fn lookup_id_for_name(&self, name: &str) -> Result<Option<String>, RegistryError> {
        let url = self.esearch_url(name)?;
        let body = self.fetch_json(url).await?;
        Ok(parse_esearch(&body))
    }

    async fn lookup_name_for_id(
        &self,
        taxon_id: &str,
    ) -> Result<Option<TaxonSummary>, RegistryError> {
        let url = self.esummary_url(taxon_id)?;
        let body = self.fetch_json(url).await?;
        Ok(parse_esummary(&body, taxon_id))
    }
}
