use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::common::LeadId;

/// Practice-management system labels for type-safe querying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EmrSystem {
    Epic,
    Cerner,
    Athena,
    #[serde(rename = "eClinicalWorks")]
    EClinicalWorks,
    Other,
}

impl std::fmt::Display for EmrSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmrSystem::Epic => write!(f, "Epic"),
            EmrSystem::Cerner => write!(f, "Cerner"),
            EmrSystem::Athena => write!(f, "Athena"),
            EmrSystem::EClinicalWorks => write!(f, "eClinicalWorks"),
            EmrSystem::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for EmrSystem {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Epic" => Ok(EmrSystem::Epic),
            "Cerner" => Ok(EmrSystem::Cerner),
            "Athena" => Ok(EmrSystem::Athena),
            "eClinicalWorks" => Ok(EmrSystem::EClinicalWorks),
            "Other" => Ok(EmrSystem::Other),
            _ => Err(anyhow::anyhow!("Invalid EMR system: {}", s)),
        }
    }
}

/// Clinic size labels for type-safe querying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClinicSize {
    Solo,
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for ClinicSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClinicSize::Solo => write!(f, "Solo"),
            ClinicSize::Small => write!(f, "Small"),
            ClinicSize::Medium => write!(f, "Medium"),
            ClinicSize::Large => write!(f, "Large"),
        }
    }
}

impl std::str::FromStr for ClinicSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Solo" => Ok(ClinicSize::Solo),
            "Small" => Ok(ClinicSize::Small),
            "Medium" => Ok(ClinicSize::Medium),
            "Large" => Ok(ClinicSize::Large),
            _ => Err(anyhow::anyhow!("Invalid clinic size: {}", s)),
        }
    }
}

/// A provider lead sourced from the public registry.
///
/// The NPI is the sole deduplication key; `id` exists for foreign keys and
/// stable pagination. `has_email` is derived and must always agree with
/// `email` being set and non-empty - every writer keeps both in one update.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lead {
    pub id: LeadId,
    pub npi: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub clinic_name: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub specialty: String,
    // Contact state
    pub email: Option<String>,
    pub has_email: bool,
    /// Written only by the outbound-delivery collaborator; read here.
    pub is_emailed: bool,
    /// Monotonic; set once a record has been through one recruitment pass.
    pub visited: bool,
    // Estimated attributes
    pub emr_system: String, // 'Epic', 'Cerner', 'Athena', 'eClinicalWorks', 'Other'
    pub emr_confidence: f64,
    pub emr_source: String,
    pub clinic_size: String, // 'Solo', 'Small', 'Medium', 'Large'
    pub clinic_size_confidence: f64,
    pub clinic_size_source: String,
    // Enrichment attributes (populated only by the match engine)
    pub apollo_email: Option<String>,
    pub apollo_email_status: Option<String>,
    pub apollo_confidence: Option<f64>,
    pub apollo_organization: Option<String>,
    pub apollo_linkedin_url: Option<String>,
    pub apollo_phone_numbers: Option<Vec<String>>,
    pub apollo_website_url: Option<String>,
    /// Monotonic; true once a paid lookup was issued for this record.
    pub apollo_searched: bool,
    pub email_valid: Option<bool>,
    pub email_verification: Option<serde_json::Value>,
    // Provenance
    pub data_source: String,
    pub enrichment_status: String, // 'scout_only', 'apollo_enriched'
    pub created_at: DateTime<Utc>,
    pub last_enriched_at: Option<DateTime<Utc>>,
}

/// Input for creating a new lead at ingestion time
#[derive(Debug, Clone)]
pub struct NewLead {
    pub npi: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub clinic_name: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub specialty: String,
    pub email: Option<String>,
    pub emr_system: String,
    pub emr_confidence: f64,
    pub clinic_size: String,
    pub clinic_size_confidence: f64,
    pub data_source: String,
}

impl NewLead {
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Enrichment result to merge into a searched lead
#[derive(Debug, Clone)]
pub struct ApplyEnrichment {
    pub npi: String,
    pub email: Option<String>,
    pub email_status: Option<String>,
    pub confidence: Option<f64>,
    pub organization: Option<String>,
    pub linkedin_url: Option<String>,
    pub phone_numbers: Vec<String>,
    pub website_url: Option<String>,
    pub email_valid: Option<bool>,
    pub verification: Option<serde_json::Value>,
}

/// Per-city rollup counts
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeadStats {
    pub total_leads: i64,
    pub with_email: i64,
    pub without_email: i64,
    pub apollo_searched: i64,
    pub apollo_enriched: i64,
}

impl Lead {
    /// Find lead by NPI
    pub async fn find_by_npi(npi: &str, pool: &PgPool) -> Result<Option<Self>> {
        let lead = sqlx::query_as::<_, Self>("SELECT * FROM leads WHERE npi = $1")
            .bind(npi)
            .fetch_optional(pool)
            .await?;
        Ok(lead)
    }

    /// NPIs from the given set that are already stored (single query)
    pub async fn existing_npis(npis: &[String], pool: &PgPool) -> Result<HashSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT npi FROM leads WHERE npi = ANY($1)")
            .bind(npis)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Insert a batch of new leads in one statement.
    ///
    /// Duplicate NPIs are silently skipped (`ON CONFLICT DO NOTHING`), so a
    /// collision on one record never aborts its siblings. Returns the number
    /// of rows actually inserted.
    pub async fn bulk_insert(leads: &[NewLead], pool: &PgPool) -> Result<u64> {
        if leads.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = leads.iter().map(|_| LeadId::new().into_uuid()).collect();
        let npis: Vec<String> = leads.iter().map(|l| l.npi.clone()).collect();
        let names: Vec<String> = leads.iter().map(|l| l.name.clone()).collect();
        let first_names: Vec<String> = leads.iter().map(|l| l.first_name.clone()).collect();
        let last_names: Vec<String> = leads.iter().map(|l| l.last_name.clone()).collect();
        let clinic_names: Vec<Option<String>> = leads.iter().map(|l| l.clinic_name.clone()).collect();
        let addresses: Vec<String> = leads.iter().map(|l| l.address.clone()).collect();
        let cities: Vec<String> = leads.iter().map(|l| l.city.clone()).collect();
        let states: Vec<String> = leads.iter().map(|l| l.state.clone()).collect();
        let zips: Vec<String> = leads.iter().map(|l| l.zip.clone()).collect();
        let phones: Vec<Option<String>> = leads.iter().map(|l| l.phone.clone()).collect();
        let faxes: Vec<Option<String>> = leads.iter().map(|l| l.fax.clone()).collect();
        let specialties: Vec<String> = leads.iter().map(|l| l.specialty.clone()).collect();
        let emails: Vec<Option<String>> = leads.iter().map(|l| l.email.clone()).collect();
        let emr_systems: Vec<String> = leads.iter().map(|l| l.emr_system.clone()).collect();
        let emr_confidences: Vec<f64> = leads.iter().map(|l| l.emr_confidence).collect();
        let clinic_sizes: Vec<String> = leads.iter().map(|l| l.clinic_size.clone()).collect();
        let size_confidences: Vec<f64> = leads.iter().map(|l| l.clinic_size_confidence).collect();
        let data_sources: Vec<String> = leads.iter().map(|l| l.data_source.clone()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO leads (
                id, npi, name, first_name, last_name, clinic_name, address,
                city, state, zip, phone, fax, specialty, email, has_email,
                emr_system, emr_confidence, emr_source,
                clinic_size, clinic_size_confidence, clinic_size_source,
                data_source
            )
            SELECT
                n.id, n.npi, n.name, n.first_name, n.last_name, n.clinic_name,
                n.address, n.city, n.state, n.zip, n.phone, n.fax, n.specialty,
                NULLIF(n.email, ''),
                n.email IS NOT NULL AND n.email <> '',
                n.emr_system, n.emr_confidence, 'regional_estimate',
                n.clinic_size, n.clinic_size_confidence, 'regional_estimate',
                n.data_source
            FROM UNNEST(
                $1::uuid[], $2::text[], $3::text[], $4::text[], $5::text[],
                $6::text[], $7::text[], $8::text[], $9::text[], $10::text[],
                $11::text[], $12::text[], $13::text[], $14::text[],
                $15::text[], $16::float8[], $17::text[], $18::float8[],
                $19::text[]
            ) AS n(
                id, npi, name, first_name, last_name, clinic_name, address,
                city, state, zip, phone, fax, specialty, email,
                emr_system, emr_confidence, clinic_size, clinic_size_confidence,
                data_source
            )
            ON CONFLICT (npi) DO NOTHING
            "#,
        )
        .bind(&ids)
        .bind(&npis)
        .bind(&names)
        .bind(&first_names)
        .bind(&last_names)
        .bind(&clinic_names)
        .bind(&addresses)
        .bind(&cities)
        .bind(&states)
        .bind(&zips)
        .bind(&phones)
        .bind(&faxes)
        .bind(&specialties)
        .bind(&emails)
        .bind(&emr_systems)
        .bind(&emr_confidences)
        .bind(&clinic_sizes)
        .bind(&size_confidences)
        .bind(&data_sources)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Select up to `limit` unvisited leads for a city/specialty, with-email
    /// records first (they cost nothing to recruit).
    pub async fn select_unvisited(
        city: &str,
        specialty: Option<&str>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let leads = sqlx::query_as::<_, Self>(
            r#"
            SELECT *
            FROM leads
            WHERE city ILIKE $1
              AND ($2::text IS NULL OR specialty ILIKE $2)
              AND NOT visited
            ORDER BY has_email DESC, created_at ASC
            LIMIT $3
            "#,
        )
        .bind(city)
        .bind(specialty)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(leads)
    }

    /// Merge an enrichment result into a searched lead.
    ///
    /// The registry-sourced email always wins: the enrichment email only
    /// fills `email` when the stored value is empty, and `has_email` is
    /// recomputed from the same expression so the invariant holds in one
    /// statement.
    pub async fn apply_enrichment(update: ApplyEnrichment, pool: &PgPool) -> Result<Self> {
        let lead = sqlx::query_as::<_, Self>(
            r#"
            UPDATE leads
            SET email = COALESCE(NULLIF(email, ''), NULLIF($2, '')),
                has_email = COALESCE(NULLIF(email, ''), NULLIF($2, '')) IS NOT NULL,
                apollo_email = COALESCE(NULLIF($2, ''), apollo_email),
                apollo_email_status = COALESCE($3, apollo_email_status),
                apollo_confidence = COALESCE($4, apollo_confidence),
                apollo_organization = COALESCE($5, apollo_organization),
                apollo_linkedin_url = COALESCE($6, apollo_linkedin_url),
                apollo_phone_numbers = $7,
                apollo_website_url = COALESCE($8, apollo_website_url),
                email_valid = COALESCE($9, email_valid),
                email_verification = COALESCE($10, email_verification),
                apollo_searched = TRUE,
                enrichment_status = 'apollo_enriched',
                last_enriched_at = NOW()
            WHERE npi = $1
            RETURNING *
            "#,
        )
        .bind(&update.npi)
        .bind(&update.email)
        .bind(&update.email_status)
        .bind(update.confidence)
        .bind(&update.organization)
        .bind(&update.linkedin_url)
        .bind(&update.phone_numbers)
        .bind(&update.website_url)
        .bind(update.email_valid)
        .bind(&update.verification)
        .fetch_one(pool)
        .await?;
        Ok(lead)
    }

    /// Record that a paid lookup was issued for these leads, match or not
    pub async fn mark_searched(npis: &[String], pool: &PgPool) -> Result<()> {
        if npis.is_empty() {
            return Ok(());
        }
        sqlx::query(
            r#"
            UPDATE leads
            SET apollo_searched = TRUE,
                last_enriched_at = NOW()
            WHERE npi = ANY($1)
            "#,
        )
        .bind(npis)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a whole recruitment batch visited in one bulk update
    pub async fn mark_visited(npis: &[String], pool: &PgPool) -> Result<()> {
        if npis.is_empty() {
            return Ok(());
        }
        sqlx::query("UPDATE leads SET visited = TRUE WHERE npi = ANY($1)")
            .bind(npis)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Leads with an email that have not yet been contacted
    pub async fn ready_for_outreach(
        city: &str,
        specialty: Option<&str>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let leads = sqlx::query_as::<_, Self>(
            r#"
            SELECT *
            FROM leads
            WHERE city ILIKE $1
              AND ($2::text IS NULL OR specialty ILIKE $2)
              AND has_email
              AND NOT is_emailed
            ORDER BY created_at ASC
            LIMIT $3
            "#,
        )
        .bind(city)
        .bind(specialty)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(leads)
    }

    /// List stored leads filtered by city and/or predicted system
    pub async fn search(
        city: Option<&str>,
        emr_system: Option<&str>,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let leads = sqlx::query_as::<_, Self>(
            r#"
            SELECT *
            FROM leads
            WHERE ($1::text IS NULL OR city ILIKE $1)
              AND ($2::text IS NULL OR emr_system = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(city)
        .bind(emr_system)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(leads)
    }

    /// Total row count for the search filters (pagination)
    pub async fn count_filtered(
        city: Option<&str>,
        emr_system: Option<&str>,
        pool: &PgPool,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM leads
            WHERE ($1::text IS NULL OR city ILIKE $1)
              AND ($2::text IS NULL OR emr_system = $2)
            "#,
        )
        .bind(city)
        .bind(emr_system)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Count of leads that have consumed a paid lookup
    pub async fn searched_count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE apollo_searched")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Rollup counts for one city
    pub async fn stats_for_city(city: &str, pool: &PgPool) -> Result<LeadStats> {
        let stats = sqlx::query_as::<_, LeadStats>(
            r#"
            SELECT COUNT(*) AS total_leads,
                   COUNT(*) FILTER (WHERE has_email) AS with_email,
                   COUNT(*) FILTER (WHERE NOT has_email) AS without_email,
                   COUNT(*) FILTER (WHERE apollo_searched) AS apollo_searched,
                   COUNT(*) FILTER (WHERE enrichment_status = 'apollo_enriched') AS apollo_enriched
            FROM leads
            WHERE city ILIKE $1
            "#,
        )
        .bind(city)
        .fetch_one(pool)
        .await?;
        Ok(stats)
    }
}
