//! Manifest entry model and diagnostic wording
//!
//! Pure functions only: nothing here talks to the registry.

/// Registry identifier for the "unidentified" placeholder taxon
pub const UNIDENTIFIED_TAXON_ID: &str = "32644";

/// Ranks specific enough for a sample declaration (blank rank is also accepted)
pub const ACCEPTED_RANKS: [&str; 4] = ["genus", "species", "subspecies", "strain"];

/// Name used for the registry in diagnostic text
const REGISTRY_NAME: &str = "NCBI";

/// One manifest row under validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Supplier sample name, used only for attribution
    pub sample_id: String,
    /// Declared species name, `None` when not provided
    pub common_name: Option<String>,
    /// Declared taxonomy identifier (as text), `None` when not provided
    pub taxon_id: Option<String>,
}

/// Memoization key: the declared (name, id) pair exactly as written
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub common_name: String,
    pub taxon_id: String,
}

/// Row-level error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// One or both declared fields absent
    Missing,
    /// Name and id both resolve but disagree
    NameIdMismatch,
    /// The declared id is what the name resolves to, but the id's canonical
    /// name differs from the declared name
    ImpreciseMatch,
    /// At least one side unknown to the registry
    Unresolved,
}

impl ManifestEntry {
    pub fn new(
        sample_id: impl Into<String>,
        common_name: Option<&str>,
        taxon_id: Option<&str>,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            common_name: common_name.map(str::to_string),
            taxon_id: taxon_id.map(str::to_string),
        }
    }

    /// Key shared by every entry declaring the same pair; `None` if a field is missing
    pub fn query_key(&self) -> Option<QueryKey> {
        match (&self.common_name, &self.taxon_id) {
            (Some(common_name), Some(taxon_id)) => Some(QueryKey {
                common_name: common_name.clone(),
                taxon_id: taxon_id.clone(),
            }),
            _ => None,
        }
    }

    /// Sentence describing the declared common name and what it resolved to
    pub fn common_name_statement(&self, resolved_id: Option<&str>) -> String {
        match (&self.common_name, resolved_id) {
            (None, _) => "No common name specified. ".to_string(),
            (Some(name), None) => format!(
                "The given common name '{}' does not exist in the {} database. ",
                name, REGISTRY_NAME
            ),
            (Some(name), Some(id)) => format!("The taxon ID for given name '{}' is {}. ", name, id),
        }
    }

    /// Sentence describing the declared taxon ID and what it resolved to
    pub fn taxon_id_statement(&self, resolved_name: Option<&str>) -> String {
        match (&self.taxon_id, resolved_name) {
            (None, _) => "No taxon ID specified.".to_string(),
            (Some(id), None) => format!(
                "The given taxon ID {} does not exist in the {} database.",
                id, REGISTRY_NAME
            ),
            (Some(id), Some(name)) => {
                format!("The official name for the given taxon ID {} is '{}'.", id, name)
            }
        }
    }

    /// Prefix a message body with this entry's sample id
    pub fn attribute(&self, body: &str) -> String {
        format!("{}: {}", self.sample_id, body)
    }

    /// Final error line for this entry
    pub fn format_error(
        &self,
        kind: ErrorKind,
        common_name_statement: &str,
        taxon_id_statement: &str,
    ) -> String {
        self.attribute(&error_body(kind, common_name_statement, taxon_id_statement))
    }

    /// Error line for a row lacking a declared field, `None` when both are present
    pub fn missing_field_error(&self) -> Option<String> {
        match (&self.common_name, &self.taxon_id) {
            (Some(_), Some(_)) => None,
            (None, None) => Some(self.attribute(&format!(
                "No taxon ID or common name specified. If unknown please use {} - 'unidentified'.",
                UNIDENTIFIED_TAXON_ID
            ))),
            (None, Some(id)) => Some(self.format_error(
                ErrorKind::Missing,
                &self.common_name_statement(None),
                &format!("Taxon ID {} cannot be checked without a common name.", id),
            )),
            (Some(name), None) => Some(self.format_error(
                ErrorKind::Missing,
                &format!("Common name '{}' cannot be checked without a taxon ID. ", name),
                &self.taxon_id_statement(None),
            )),
        }
    }
}

/// Message body (without sample attribution) for an error kind
pub fn error_body(kind: ErrorKind, common_name_statement: &str, taxon_id_statement: &str) -> String {
    match kind {
        ErrorKind::NameIdMismatch => format!(
            "Taxon ID and common name don't match. {}{}",
            common_name_statement, taxon_id_statement
        ),
        ErrorKind::ImpreciseMatch => format!(
            "Common name is not precise. {}{}",
            common_name_statement, taxon_id_statement
        ),
        ErrorKind::Missing | ErrorKind::Unresolved => {
            format!("{}{}", common_name_statement, taxon_id_statement)
        }
    }
}

/// Whether a registry rank is specific enough
pub fn is_accepted_rank(rank: Option<&str>) -> bool {
    match rank {
        None => true,
        Some(r) => r.trim().is_empty() || ACCEPTED_RANKS.contains(&r),
    }
}

/// Advisory body for an identifier whose rank is too coarse
pub fn rank_advisory(rank: &str) -> String {
    format!(
        "Given taxon ID corresponds to the rank '{}' - please use a taxon no higher than \
         genus/species, or the ID {} with 'unidentified' if a more accurate rank is not known.",
        rank, UNIDENTIFIED_TAXON_ID
    )
}
