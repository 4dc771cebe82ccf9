//! Lead query actions
//!
//! Query actions return data directly; no credit is spent here.

use anyhow::Result;
use nppes_client::RegistryProvider;
use serde::Serialize;
use tracing::info;

use crate::domains::leads::models::{CreditLedger, Lead, LeadStats};
use crate::kernel::ServerDeps;

/// One page of stored leads plus the unpaginated total
#[derive(Debug, Clone, Serialize)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub total_count: i64,
}

/// Point lookup by NPI: the stored lead when present, and the live registry
/// record for comparison.
#[derive(Debug, Clone, Serialize)]
pub struct NpiLookup {
    pub stored: Option<Lead>,
    pub registry: Option<RegistryProvider>,
}

/// City rollup plus the state of the credit ledger
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub city: String,
    pub stats: LeadStats,
    pub credits: CreditLedger,
    pub remaining_credits: i64,
}

/// List stored leads filtered by city and/or predicted system
pub async fn search_leads(
    city: Option<&str>,
    emr_system: Option<&str>,
    limit: i64,
    offset: i64,
    deps: &ServerDeps,
) -> Result<LeadPage> {
    let pool = &deps.db_pool;
    let leads = Lead::search(city, emr_system, limit, offset, pool).await?;
    let total_count = Lead::count_filtered(city, emr_system, pool).await?;
    Ok(LeadPage { leads, total_count })
}

/// Look up one provider by NPI, both in the store and upstream
pub async fn lookup_npi(npi: &str, deps: &ServerDeps) -> Result<NpiLookup> {
    info!(npi, "Looking up provider");
    let stored = Lead::find_by_npi(npi, &deps.db_pool).await?;
    let registry = deps.registry.lookup_by_npi(npi).await?;
    Ok(NpiLookup { stored, registry })
}

/// Rollup counts for one city, with the current credit position
pub async fn city_stats(city: &str, deps: &ServerDeps) -> Result<StatsReport> {
    let pool = &deps.db_pool;
    let stats = Lead::stats_for_city(city, pool).await?;
    let credits = CreditLedger::fetch(pool).await?;
    let remaining_credits = CreditLedger::remaining(pool).await?;
    Ok(StatsReport {
        city: city.to_string(),
        stats,
        credits,
        remaining_credits,
    })
}
