use serde::Deserialize;

/// People search envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub people: Vec<RawPerson>,
}

/// Person match envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse {
    pub person: Option<RawPerson>,
}

/// A raw person entry as returned by the API.
///
/// `phone_numbers` is kept as raw JSON values because the API returns a
/// mix of plain strings and `{"raw_number": ...}` objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPerson {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_status: String,
    #[serde(default)]
    pub has_email: bool,
    #[serde(default)]
    pub linkedin_url: String,
    pub organization: Option<RawOrganization>,
    #[serde(default)]
    pub phone_numbers: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOrganization {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub website_url: String,
}

/// Parameters for a person enrichment lookup. Name fields are required;
/// everything else narrows the match when available.
#[derive(Debug, Clone, Default)]
pub struct EnrichRequest {
    pub first_name: String,
    pub last_name: String,
    pub organization_name: Option<String>,
    pub domain: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// A search candidate annotated with its healthcare relevance score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub score: f64,
    pub person: RawPerson,
}

/// A resolved contact match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub email: String,
    pub email_status: String,
    pub confidence: f64,
    pub organization: String,
    pub linkedin_url: String,
    pub phone_numbers: Vec<String>,
    pub website_url: String,
}
