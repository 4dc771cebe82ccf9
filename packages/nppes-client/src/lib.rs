//! Pure NPPES registry REST API client.
//!
//! A minimal client for the CMS National Provider Identifier registry.
//! Supports paginated provider search by city/state/specialty and point
//! lookup by NPI, and normalizes raw registry entries into clean
//! [`RegistryProvider`] records.
//!
//! # Example
//!
//! ```rust,ignore
//! use nppes_client::NppesClient;
//!
//! let client = NppesClient::new()?;
//!
//! let providers = client
//!     .search_providers("Novi", Some("MI"), Some("Family Medicine"), 25)
//!     .await?;
//! for p in &providers {
//!     println!("{} ({})", p.name, p.npi);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{NppesError, Result};
pub use types::{RawProvider, RawTaxonomy, RegistryProvider, SearchResponse};

use std::time::Duration;

const BASE_URL: &str = "https://npiregistry.cms.hhs.gov/api/";
const API_VERSION: &str = "2.1";

/// Registry page size per request.
const PAGE_SIZE: usize = 50;

/// The registry rejects offsets past this point regardless of page size.
const MAX_SKIP: usize = 1000;

/// Common specialty names mapped to NPI taxonomy descriptions.
const SPECIALTY_TAXONOMY_MAP: &[(&str, &str)] = &[
    ("Primary Care", "Internal Medicine"),
    ("Family Medicine", "Family Medicine"),
    ("Cardiology", "Cardiovascular Disease"),
    ("Dermatology", "Dermatology"),
    ("Orthopedics", "Orthopaedic Surgery"),
    ("Pediatrics", "Pediatrics"),
    ("Neurology", "Neurology"),
    ("Oncology", "Medical Oncology"),
    ("Psychiatry", "Psychiatry"),
    ("Gastroenterology", "Gastroenterology"),
    ("Pulmonology", "Pulmonary Disease"),
    ("Endocrinology", "Endocrinology, Diabetes & Metabolism"),
    ("Rheumatology", "Rheumatology"),
    ("Nephrology", "Nephrology"),
    ("Urology", "Urology"),
];

/// Major US cities mapped to state abbreviations, for queries without a state.
const MAJOR_CITY_STATES: &[(&str, &str)] = &[
    ("new york", "NY"),
    ("los angeles", "CA"),
    ("chicago", "IL"),
    ("houston", "TX"),
    ("phoenix", "AZ"),
    ("philadelphia", "PA"),
    ("san antonio", "TX"),
    ("san diego", "CA"),
    ("dallas", "TX"),
    ("san jose", "CA"),
    ("austin", "TX"),
    ("jacksonville", "FL"),
    ("fort worth", "TX"),
    ("columbus", "OH"),
    ("charlotte", "NC"),
    ("san francisco", "CA"),
    ("indianapolis", "IN"),
    ("seattle", "WA"),
    ("denver", "CO"),
    ("boston", "MA"),
    ("nashville", "TN"),
    ("detroit", "MI"),
    ("novi", "MI"),
    ("ann arbor", "MI"),
    ("grand rapids", "MI"),
    ("portland", "OR"),
    ("las vegas", "NV"),
    ("miami", "FL"),
    ("atlanta", "GA"),
    ("baltimore", "MD"),
    ("minneapolis", "MN"),
    ("cleveland", "OH"),
    ("pittsburgh", "PA"),
    ("orlando", "FL"),
    ("tampa", "FL"),
    ("milwaukee", "WI"),
];

/// Address line 2 prefixes that mark a unit designator, not an organization.
const SUITE_PREFIXES: &[&str] = &[
    "suite", "ste ", "ste.", "#", "floor", "fl ", "unit", "apt", "bldg", "building",
];

/// Map a common specialty name to its NPI taxonomy description.
/// Unknown specialties pass through unchanged.
pub fn map_specialty_to_taxonomy(specialty: &str) -> &str {
    SPECIALTY_TAXONOMY_MAP
        .iter()
        .find(|(name, _)| *name == specialty)
        .map(|(_, taxonomy)| *taxonomy)
        .unwrap_or(specialty)
}

/// Guess a state abbreviation from a city name.
pub fn guess_state_from_city(city: &str) -> Option<&'static str> {
    let city_lower = city.trim().to_lowercase();
    MAJOR_CITY_STATES
        .iter()
        .find(|(name, _)| *name == city_lower)
        .map(|(_, state)| *state)
}

pub struct NppesClient {
    client: reqwest::Client,
}

impl NppesClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Search the registry for individual providers, paginating with an
    /// offset cursor until `limit` normalized records are collected, the
    /// registry is exhausted, or its offset ceiling is reached.
    pub async fn search_providers(
        &self,
        city: &str,
        state: Option<&str>,
        specialty: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RegistryProvider>> {
        let state = state
            .map(str::to_string)
            .or_else(|| guess_state_from_city(city).map(str::to_string));
        let taxonomy = specialty.map(map_specialty_to_taxonomy);

        let mut providers = Vec::new();
        let mut skip = 0usize;

        while providers.len() < limit && skip < MAX_SKIP {
            let page = self
                .fetch_page(city, state.as_deref(), taxonomy, skip)
                .await?;
            let page_len = page.results.len();
            tracing::debug!(city, ?taxonomy, skip, page_len, "Fetched registry page");

            for value in page.results {
                if providers.len() >= limit {
                    break;
                }
                let raw: RawProvider = match serde_json::from_value(value) {
                    Ok(raw) => raw,
                    Err(err) => {
                        tracing::debug!(error = %err, "Skipping malformed registry entry");
                        continue;
                    }
                };
                if let Some(provider) =
                    Self::normalize_entry(&raw, taxonomy, city, state.as_deref())
                {
                    providers.push(provider);
                }
            }

            if page_len < PAGE_SIZE {
                break;
            }
            skip += page_len;
        }

        tracing::info!(
            city,
            ?taxonomy,
            count = providers.len(),
            "Registry search completed"
        );
        Ok(providers)
    }

    /// Look up a single provider by its NPI number, normalized the same way
    /// as search results. The specialty comes from the entry's primary
    /// taxonomy since there is no search taxonomy to carry over.
    pub async fn lookup_by_npi(&self, npi: &str) -> Result<Option<RegistryProvider>> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[("version", API_VERSION), ("number", npi)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NppesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: SearchResponse = resp.json().await?;
        Ok(envelope
            .results
            .into_iter()
            .find_map(|value| serde_json::from_value::<RawProvider>(value).ok())
            .and_then(|raw| Self::normalize_entry(&raw, None, "", None)))
    }

    async fn fetch_page(
        &self,
        city: &str,
        state: Option<&str>,
        taxonomy: Option<&str>,
        skip: usize,
    ) -> Result<SearchResponse> {
        let limit = PAGE_SIZE.to_string();
        let skip_param = skip.to_string();
        let mut params = vec![
            ("version", API_VERSION),
            ("city", city),
            ("enumeration_type", "NPI-1"),
            ("limit", limit.as_str()),
            ("skip", skip_param.as_str()),
        ];
        if let Some(taxonomy) = taxonomy {
            params.push(("taxonomy_description", taxonomy));
        }
        if let Some(state) = state {
            params.push(("state", state));
        }

        let resp = self.client.get(BASE_URL).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NppesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Normalize a raw registry entry. Returns `None` when the entry lacks a
    /// usable name or address. Without a search taxonomy the specialty falls
    /// back to the entry's primary taxonomy description.
    fn normalize_entry(
        raw: &RawProvider,
        taxonomy: Option<&str>,
        fallback_city: &str,
        fallback_state: Option<&str>,
    ) -> Option<RegistryProvider> {
        let npi = raw.number.clone()?;
        let specialty = taxonomy
            .or_else(|| raw.primary_taxonomy())
            .unwrap_or_default()
            .to_string();

        let first_name = title_case(raw.basic.first_name.trim());
        let last_name = title_case(raw.basic.last_name.trim());
        if first_name.is_empty() || last_name.is_empty() {
            return None;
        }

        let credential = if raw.basic.credential.trim().is_empty() {
            "MD"
        } else {
            raw.basic.credential.trim()
        };
        let name = format!("Dr. {} {}, {}", first_name, last_name, credential);

        // Prefer the practice location address over a mailing address.
        let practice = raw
            .addresses
            .iter()
            .find(|a| a.address_purpose == "LOCATION")
            .or_else(|| raw.addresses.first())?;

        let organization_name = Self::extract_organization(raw, practice);

        let direct_messaging_address = raw
            .endpoints
            .iter()
            .find(|e| e.endpoint_type.to_uppercase() == "DIRECT")
            .map(|e| e.endpoint.clone())
            .filter(|addr| !addr.is_empty());

        let city = if practice.city.is_empty() {
            title_case(fallback_city)
        } else {
            title_case(&practice.city)
        };
        let state = if practice.state.is_empty() {
            fallback_state.unwrap_or_default().to_string()
        } else {
            practice.state.clone()
        };

        Some(RegistryProvider {
            npi,
            name,
            first_name,
            last_name,
            address: practice.address_1.clone(),
            city,
            state,
            zip: practice.postal_code.chars().take(5).collect(),
            phone: format_number(&practice.telephone_number),
            fax: format_number(&practice.fax_number),
            specialty,
            organization_name,
            direct_messaging_address,
        })
    }

    /// Pick an organization name: the explicit registry field when present,
    /// otherwise address line 2 when it is not a unit designator.
    fn extract_organization(
        raw: &RawProvider,
        practice: &types::RawAddress,
    ) -> Option<String> {
        let explicit = raw.basic.organization_name.trim();
        if !explicit.is_empty() {
            return Some(explicit.to_string());
        }

        let address_2 = practice.address_2.trim();
        if address_2.is_empty() {
            return None;
        }

        let lower = address_2.to_lowercase();
        let is_unit_designator = SUITE_PREFIXES.iter().any(|p| lower.starts_with(p));
        if is_unit_designator || address_2.len() <= 5 {
            tracing::debug!(address_2, "Skipping address line 2 as unit designator");
            return None;
        }

        Some(address_2.to_string())
    }
}

/// Format a phone/fax number as XXX-XXX-XXXX when it has 10 digits
/// (or 11 with a leading country code 1); otherwise return it unchanged.
/// Empty input yields `None`.
fn format_number(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let formatted = if digits.len() == 10 {
        format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else if digits.len() == 11 && digits.starts_with('1') {
        format!("{}-{}-{}", &digits[1..4], &digits[4..7], &digits[7..])
    } else {
        raw.to_string()
    };
    Some(formatted)
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
