//! Bulk load action - registry fetch, estimation, dedup, single insert

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::domains::leads::estimator::Estimator;
use crate::domains::leads::models::{Lead, NewLead};
use crate::kernel::ServerDeps;

/// Counts for one bulk-load pass. `with_email` / `without_email` describe the
/// batch that survived dedup, matching what was handed to the insert.
#[derive(Debug, Clone, Serialize)]
pub struct BulkLoadResult {
    pub loaded: u64,
    pub with_email: u64,
    pub without_email: u64,
}

/// Load providers from the public registry into the leads table.
///
/// This action:
/// 1. Fetches and normalizes up to `limit` providers for the city/specialty
/// 2. Runs both estimators on each record
/// 3. Filters out NPIs already stored (one query for the whole batch)
/// 4. Inserts the survivors in a single multi-row statement
///
/// A registry that is completely unreachable propagates as an error; partial
/// data problems were already absorbed record-by-record inside the client.
pub async fn bulk_load_leads(
    city: &str,
    state: Option<&str>,
    specialty: Option<&str>,
    limit: usize,
    deps: &ServerDeps,
) -> Result<BulkLoadResult> {
    info!(city, ?state, ?specialty, limit, "Loading leads from registry");

    let providers = deps
        .registry
        .search_providers(city, state, specialty, limit)
        .await
        .context("registry search failed")?;

    if providers.is_empty() {
        info!(city, "Registry returned no providers");
        return Ok(BulkLoadResult {
            loaded: 0,
            with_email: 0,
            without_email: 0,
        });
    }

    let estimator = Estimator::default();
    let batch: Vec<NewLead> = providers
        .into_iter()
        .map(|p| {
            // Size and system are guessed from the clinic name when we have
            // one, otherwise from the provider's display name.
            let org_name = p.organization_name.clone().unwrap_or_else(|| p.name.clone());
            let (size, system) = estimator.estimate(&org_name, &p.state);
            NewLead {
                npi: p.npi,
                name: p.name,
                first_name: p.first_name,
                last_name: p.last_name,
                clinic_name: p.organization_name,
                address: p.address,
                city: p.city,
                state: p.state,
                zip: p.zip,
                phone: p.phone,
                fax: p.fax,
                specialty: p.specialty,
                email: p.direct_messaging_address,
                emr_system: system.system.to_string(),
                emr_confidence: system.confidence,
                clinic_size: size.size.to_string(),
                clinic_size_confidence: size.confidence,
                data_source: "nppes_registry".to_string(),
            }
        })
        .collect();

    let npis: Vec<String> = batch.iter().map(|l| l.npi.clone()).collect();
    let existing = Lead::existing_npis(&npis, &deps.db_pool).await?;
    let survivors: Vec<NewLead> = batch
        .into_iter()
        .filter(|l| !existing.contains(&l.npi))
        .collect();
    debug!(
        fetched = npis.len(),
        duplicates = existing.len(),
        "Deduplicated registry batch"
    );

    let with_email = survivors.iter().filter(|l| l.has_email()).count() as u64;
    let without_email = survivors.len() as u64 - with_email;
    let loaded = Lead::bulk_insert(&survivors, &deps.db_pool).await?;

    info!(city, loaded, with_email, without_email, "Bulk load completed");

    Ok(BulkLoadResult {
        loaded,
        with_email,
        without_email,
    })
}
