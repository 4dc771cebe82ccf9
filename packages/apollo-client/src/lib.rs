//! Pure Apollo.io people search and enrichment REST API client.
//!
//! Finds contact emails for healthcare providers. When a real organization
//! name is known, a single exact-match lookup is issued; otherwise the
//! client falls back to a hierarchical name search (city+state, then state
//! only, then no location) and only resolves contact details for the top
//! candidate once it clears a healthcare relevance gate.
//!
//! # Example
//!
//! ```rust,ignore
//! use apollo_client::{ApolloClient, EnrichRequest};
//!
//! let client = ApolloClient::new(api_key)?;
//!
//! let result = client
//!     .enrich_person_by_name(&EnrichRequest {
//!         first_name: "Jane".to_string(),
//!         last_name: "Doe".to_string(),
//!         city: Some("Novi".to_string()),
//!         state: Some("MI".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

pub mod error;
pub mod relevance;
pub mod types;

pub use error::{ApolloError, Result};
pub use relevance::RelevanceTables;
pub use types::{EnrichRequest, MatchResult, RawPerson, ScoredCandidate};

use std::time::Duration;

use futures::future::join_all;
use serde_json::json;
use types::{MatchResponse, SearchResponse};

const BASE_URL: &str = "https://api.apollo.io/api/v1";

/// Candidates per search page.
const PER_PAGE: u32 = 20;

/// Minimum healthcare score before the costly detail lookup is issued.
const RELEVANCE_GATE: f64 = 0.6;

pub struct ApolloClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    relevance: RelevanceTables,
}

impl ApolloClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_tables(api_key, RelevanceTables::default())
    }

    /// Construct with substituted relevance tables.
    pub fn with_tables(api_key: impl Into<String>, relevance: RelevanceTables) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            relevance,
        })
    }

    pub fn relevance(&self) -> &RelevanceTables {
        &self.relevance
    }

    /// Enrich a person by name.
    ///
    /// A non-generic organization name routes to the exact-match endpoint;
    /// a generic or absent one routes to the hierarchical name search.
    pub async fn enrich_person_by_name(
        &self,
        req: &EnrichRequest,
    ) -> Result<Option<MatchResult>> {
        let organization = req.organization_name.as_deref().filter(|name| {
            if self.relevance.is_generic_organization(name) {
                tracing::debug!(
                    organization = name,
                    "Ignoring generic organization name, using name search"
                );
                false
            } else {
                true
            }
        });

        let Some(organization) = organization else {
            return self
                .search_by_name(
                    &req.first_name,
                    &req.last_name,
                    req.city.as_deref(),
                    req.state.as_deref(),
                )
                .await;
        };

        let mut payload = json!({
            "first_name": req.first_name,
            "last_name": req.last_name,
            "organization_name": organization,
        });
        if let Some(domain) = &req.domain {
            payload["domain"] = json!(domain);
        }
        if let Some(email) = &req.email {
            payload["email"] = json!(email);
        }
        if let Some(linkedin_url) = &req.linkedin_url {
            payload["linkedin_url"] = json!(linkedin_url);
        }

        let resp: MatchResponse = self.post("people/match", &payload).await?;
        match resp.person {
            Some(person) if !person.email.is_empty() => Ok(Some(self.build_result(person))),
            Some(person) => {
                tracing::info!(
                    first_name = %req.first_name,
                    last_name = %req.last_name,
                    organization,
                    linkedin_url = %person.linkedin_url,
                    "Match found but no email available"
                );
                Ok(None)
            }
            None => {
                tracing::info!(
                    first_name = %req.first_name,
                    last_name = %req.last_name,
                    organization,
                    "No match"
                );
                Ok(None)
            }
        }
    }

    /// Search for people by name, trying three strategies in order:
    /// city+state, state only, no location. The first strategy returning
    /// any candidates wins; an empty or erroring strategy falls through.
    /// Candidates are sorted by descending healthcare score.
    pub async fn hierarchical_search(
        &self,
        first_name: &str,
        last_name: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> (Vec<ScoredCandidate>, &'static str) {
        let keywords = format!("{} {}", first_name, last_name);

        let mut strategies: Vec<(&'static str, serde_json::Value)> = Vec::new();
        if let (Some(city), Some(state)) = (city, state) {
            strategies.push((
                "city_state",
                json!({
                    "q_keywords": keywords,
                    "person_locations": [format!("{}, {}", city, state)],
                    "per_page": PER_PAGE,
                }),
            ));
        }
        if let Some(state) = state {
            strategies.push((
                "state_only",
                json!({
                    "q_keywords": keywords,
                    "person_locations": [state],
                    "per_page": PER_PAGE,
                }),
            ));
        }
        strategies.push((
            "no_location",
            json!({
                "q_keywords": keywords,
                "per_page": PER_PAGE,
            }),
        ));

        for (strategy, payload) in strategies {
            let people = match self
                .post::<SearchResponse>("mixed_people/api_search", &payload)
                .await
            {
                Ok(resp) => resp.people,
                Err(err) => {
                    tracing::debug!(strategy, error = %err, "Search strategy failed");
                    continue;
                }
            };
            tracing::debug!(strategy, count = people.len(), "Search strategy returned");
            if people.is_empty() {
                continue;
            }

            let mut candidates: Vec<ScoredCandidate> = people
                .into_iter()
                .map(|person| ScoredCandidate {
                    score: self.relevance.healthcare_score(&person),
                    person,
                })
                .collect();
            candidates.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            tracing::info!(strategy, count = candidates.len(), "Search found candidates");
            return (candidates, strategy);
        }

        tracing::debug!(first_name, last_name, "All search strategies exhausted");
        (Vec::new(), "failed")
    }

    /// Resolve full contact details for a person by their API id.
    pub async fn enrich_person_by_id(&self, person_id: &str) -> Result<Option<MatchResult>> {
        let payload = json!({ "id": person_id });
        let resp: MatchResponse = self.post("people/match", &payload).await?;
        Ok(resp
            .person
            .filter(|p| !p.email.is_empty())
            .map(|p| self.build_result(p)))
    }

    /// Enrich several people concurrently. The output preserves input
    /// order; a failed lookup yields `None` in its slot.
    pub async fn enrich_many(&self, requests: &[EnrichRequest]) -> Vec<Option<MatchResult>> {
        let lookups = requests.iter().map(|req| async move {
            match self.enrich_person_by_name(req).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(
                        first_name = %req.first_name,
                        last_name = %req.last_name,
                        error = %err,
                        "Enrichment failed"
                    );
                    None
                }
            }
        });
        join_all(lookups).await
    }

    async fn search_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Option<MatchResult>> {
        let (candidates, strategy) = self
            .hierarchical_search(first_name, last_name, city, state)
            .await;

        let Some(best) = candidates.into_iter().next() else {
            tracing::debug!(first_name, last_name, "No search match");
            return Ok(None);
        };

        if best.score < RELEVANCE_GATE {
            tracing::warn!(
                first_name,
                last_name,
                score = best.score,
                title = %best.person.title,
                "Best candidate below relevance gate, skipping detail lookup"
            );
            return Ok(None);
        }

        tracing::debug!(
            first_name,
            last_name,
            strategy,
            score = best.score,
            "Relevant candidate found, resolving contact details"
        );
        self.enrich_person_by_id(&best.person.id).await
    }

    /// Build a result from a matched person that has an email.
    ///
    /// Classification is lenient here: a person we cannot verify as medical
    /// is still returned, only logged, since the match itself came from an
    /// upstream search we qualified.
    fn build_result(&self, person: RawPerson) -> MatchResult {
        let org = person.organization.unwrap_or_default();
        let email_domain = person
            .email
            .split('@')
            .nth(1)
            .unwrap_or_default()
            .to_string();

        let is_medical = self.relevance.is_medical_organization(&org.name, &email_domain);
        if !is_medical && !self.relevance.has_medical_title(&person.title) {
            tracing::debug!(
                title = %person.title,
                organization = %org.name,
                domain = %email_domain,
                "Could not verify match as medical, returning anyway"
            );
        }

        let email_status = if person.email_status.is_empty() {
            "unknown".to_string()
        } else {
            person.email_status
        };
        let confidence = if email_status == "verified" { 0.95 } else { 0.75 };

        let phone_numbers = person
            .phone_numbers
            .iter()
            .filter_map(|value| match value {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(map) => map
                    .get("raw_number")
                    .and_then(|n| n.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .collect();

        MatchResult {
            email: person.email,
            email_status,
            confidence,
            organization: org.name,
            linkedin_url: person.linkedin_url,
            phone_numbers,
            website_url: org.website_url,
        }
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Cache-Control", "no-cache")
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApolloError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::RawOrganization;

    fn client() -> ApolloClient {
        ApolloClient::new("test-key").unwrap()
    }

    fn matched_person(email_status: &str) -> RawPerson {
        RawPerson {
            id: "abc123".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            title: "Cardiologist".to_string(),
            email: "jdoe@novihealth.org".to_string(),
            email_status: email_status.to_string(),
            has_email: true,
            linkedin_url: "https://linkedin.com/in/jdoe".to_string(),
            organization: Some(RawOrganization {
                name: "Novi Heart Clinic".to_string(),
                website_url: "https://novihealth.org".to_string(),
            }),
            phone_numbers: vec![
                serde_json::json!({"raw_number": "248-555-0101"}),
                serde_json::json!("248-555-0102"),
                serde_json::json!(42),
            ],
        }
    }

    #[test]
    fn test_build_result_verified_confidence() {
        let result = client().build_result(matched_person("verified"));
        assert_eq!(result.email, "jdoe@novihealth.org");
        assert_eq!(result.email_status, "verified");
        assert!((result.confidence - 0.95).abs() < f64::EPSILON);
        assert_eq!(result.organization, "Novi Heart Clinic");
        assert_eq!(result.website_url, "https://novihealth.org");
    }

    #[test]
    fn test_build_result_unverified_confidence_and_status_fallback() {
        let result = client().build_result(matched_person(""));
        assert_eq!(result.email_status, "unknown");
        assert!((result.confidence - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_result_phone_number_extraction() {
        let result = client().build_result(matched_person("verified"));
        assert_eq!(
            result.phone_numbers,
            vec!["248-555-0101".to_string(), "248-555-0102".to_string()]
        );
    }

    #[test]
    fn test_search_envelope_defaults() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.people.is_empty());

        let resp: MatchResponse = serde_json::from_str(r#"{"person": null}"#).unwrap();
        assert!(resp.person.is_none());
    }
}
