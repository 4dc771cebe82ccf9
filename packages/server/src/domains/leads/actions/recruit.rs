//! Recruit action - credit-budgeted enrichment scheduler

use anyhow::Result;
use apollo_client::EnrichRequest;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domains::leads::models::{ApplyEnrichment, CreditLedger, Lead};
use crate::kernel::ServerDeps;

/// Outcome of one recruitment pass
#[derive(Debug, Clone, Serialize)]
pub struct RecruitResult {
    /// Leads that received a new enrichment-sourced email this pass.
    pub enriched_count: u64,
    pub returned_count: u64,
    pub remaining_credits: i64,
    /// Top-K leads ready for outbound contact after this pass.
    pub leads: Vec<Lead>,
}

/// Recruit up to `count` leads for a city/specialty, spending match-engine
/// credit only on email-less records and never beyond the global cap.
///
/// This action:
/// 1. Selects up to `count` unvisited leads, with-email records first
/// 2. Partitions the batch; reserves credit for the email-less part
/// 3. Searches the match engine for as many as the ledger granted
/// 4. Merges each hit (registry data wins field-by-field), verifying the
///    found address when a verifier is configured
/// 5. Marks every searched record `apollo_searched`, match or not
/// 6. Marks the whole selected batch visited in one bulk update
///
/// Records selected but skipped for budget are still marked visited and will
/// not be retried automatically; bounded spend per call wins over exhaustive
/// coverage.
pub async fn recruit_leads(
    city: &str,
    specialty: Option<&str>,
    count: i64,
    deps: &ServerDeps,
) -> Result<RecruitResult> {
    CreditLedger::ensure(deps.credit_cap, &deps.db_pool).await?;

    let batch = Lead::select_unvisited(city, specialty, count, &deps.db_pool).await?;
    let needs_search: Vec<&Lead> = batch.iter().filter(|l| !l.has_email).collect();

    let granted = CreditLedger::reserve(needs_search.len() as i64, &deps.db_pool).await?;
    let to_search = &needs_search[..granted as usize];
    info!(
        city,
        selected = batch.len(),
        with_email = batch.len() - needs_search.len(),
        wanted = needs_search.len(),
        granted,
        "Recruiting leads"
    );

    let requests: Vec<EnrichRequest> = to_search
        .iter()
        .map(|lead| EnrichRequest {
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            organization_name: lead.clinic_name.clone(),
            city: Some(lead.city.clone()),
            state: Some(lead.state.clone()),
            ..Default::default()
        })
        .collect();
    let results = deps.matcher.enrich_many(&requests).await;

    let mut enriched_count = 0u64;
    let mut unmatched: Vec<String> = Vec::new();
    for (lead, result) in to_search.iter().zip(results) {
        match result {
            Some(found) if !found.email.is_empty() => {
                let (email_valid, verification) = match &deps.verifier {
                    Some(verifier) => {
                        let check = verifier.verify_email(&found.email).await;
                        debug!(npi = %lead.npi, status = check.status.as_str(), "Verified enriched email");
                        let payload = serde_json::to_value(&check).ok();
                        (Some(check.status.is_deliverable()), payload)
                    }
                    None => (None, None),
                };

                let update = ApplyEnrichment {
                    npi: lead.npi.clone(),
                    email: Some(found.email),
                    email_status: none_if_empty(found.email_status),
                    confidence: Some(found.confidence),
                    organization: none_if_empty(found.organization),
                    linkedin_url: none_if_empty(found.linkedin_url),
                    phone_numbers: found.phone_numbers,
                    website_url: none_if_empty(found.website_url),
                    email_valid,
                    verification,
                };
                Lead::apply_enrichment(update, &deps.db_pool).await?;
                enriched_count += 1;
            }
            _ => {
                debug!(npi = %lead.npi, "No match for lead");
                unmatched.push(lead.npi.clone());
            }
        }
    }
    // Misses still consumed a credit and must not be retried.
    Lead::mark_searched(&unmatched, &deps.db_pool).await?;

    let batch_npis: Vec<String> = batch.iter().map(|l| l.npi.clone()).collect();
    Lead::mark_visited(&batch_npis, &deps.db_pool).await?;

    let skipped = needs_search.len() as i64 - granted;
    if skipped > 0 {
        warn!(skipped, "Credit budget exhausted; leads left unsearched");
    }

    let leads = Lead::ready_for_outreach(city, specialty, count, &deps.db_pool).await?;
    let remaining_credits = CreditLedger::remaining(&deps.db_pool).await?;

    info!(
        city,
        enriched_count,
        returned = leads.len(),
        remaining_credits,
        "Recruitment pass completed"
    );

    Ok(RecruitResult {
        enriched_count,
        returned_count: leads.len() as u64,
        remaining_credits,
        leads,
    })
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
