use serde::{Deserialize, Serialize};

/// Top-level NPPES search envelope.
///
/// `results` is kept as raw JSON values so one malformed entry can be
/// skipped without discarding the rest of the page.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: i64,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// A single raw provider entry as returned by the registry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProvider {
    pub number: Option<String>,
    #[serde(default)]
    pub basic: RawBasic,
    #[serde(default)]
    pub addresses: Vec<RawAddress>,
    #[serde(default)]
    pub taxonomies: Vec<RawTaxonomy>,
    #[serde(default)]
    pub endpoints: Vec<RawEndpoint>,
}

impl RawProvider {
    /// Description of the primary taxonomy, falling back to the first listed.
    pub fn primary_taxonomy(&self) -> Option<&str> {
        self.taxonomies
            .iter()
            .find(|t| t.primary)
            .or_else(|| self.taxonomies.first())
            .map(|t| t.desc.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaxonomy {
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBasic {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default)]
    pub organization_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAddress {
    #[serde(default)]
    pub address_purpose: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub telephone_number: String,
    #[serde(default)]
    pub fax_number: String,
}

/// NPPES uses camelCase for endpoint entries, unlike the rest of the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEndpoint {
    #[serde(rename = "endpointType", default)]
    pub endpoint_type: String,
    #[serde(default)]
    pub endpoint: String,
}

/// A normalized provider record, ready for ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryProvider {
    pub npi: String,
    /// Display name, e.g. "Dr. Jane Doe, MD".
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub specialty: String,
    pub organization_name: Option<String>,
    pub direct_messaging_address: Option<String>,
}
