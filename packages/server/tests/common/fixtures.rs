//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use apollo_client::MatchResult;
use nppes_client::RegistryProvider;
use sqlx::PgPool;

use leadgen_core::domains::leads::{CreditLedger, Lead, NewLead};

/// Build a normalized registry provider for the given identity.
pub fn registry_provider(
    npi: &str,
    first_name: &str,
    last_name: &str,
    email: Option<&str>,
) -> RegistryProvider {
    RegistryProvider {
        npi: npi.to_string(),
        name: format!("Dr. {} {}, MD", first_name, last_name),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        address: "100 Main St".to_string(),
        city: "Novi".to_string(),
        state: "MI".to_string(),
        zip: "48377".to_string(),
        phone: Some("248-555-0101".to_string()),
        fax: None,
        specialty: "Family Medicine".to_string(),
        organization_name: Some("Novi Family Practice".to_string()),
        direct_messaging_address: email.map(String::from),
    }
}

/// Build an enrichment match carrying the given email.
pub fn match_result(email: &str) -> MatchResult {
    MatchResult {
        email: email.to_string(),
        email_status: "verified".to_string(),
        confidence: 0.85,
        organization: "Novi Family Practice".to_string(),
        linkedin_url: "https://linkedin.com/in/test".to_string(),
        phone_numbers: vec!["248-555-0199".to_string()],
        website_url: "https://novifamilypractice.example".to_string(),
    }
}

/// Insert one lead directly, bypassing the registry.
pub async fn create_test_lead(
    pool: &PgPool,
    npi: &str,
    first_name: &str,
    last_name: &str,
    email: Option<&str>,
) -> Result<Lead> {
    let lead = NewLead {
        npi: npi.to_string(),
        name: format!("Dr. {} {}, MD", first_name, last_name),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        clinic_name: Some("Novi Family Practice".to_string()),
        address: "100 Main St".to_string(),
        city: "Novi".to_string(),
        state: "MI".to_string(),
        zip: "48377".to_string(),
        phone: Some("248-555-0101".to_string()),
        fax: None,
        specialty: "Family Medicine".to_string(),
        email: email.map(String::from),
        emr_system: "Epic".to_string(),
        emr_confidence: 0.55,
        clinic_size: "Small".to_string(),
        clinic_size_confidence: 0.65,
        data_source: "nppes_registry".to_string(),
    };
    Lead::bulk_insert(std::slice::from_ref(&lead), pool).await?;
    let stored = Lead::find_by_npi(npi, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("fixture lead {} was not inserted", npi))?;
    Ok(stored)
}

/// Create the credit ledger row with the given cap.
pub async fn init_ledger(cap: i64, pool: &PgPool) -> Result<()> {
    CreditLedger::ensure(cap, pool).await
}
