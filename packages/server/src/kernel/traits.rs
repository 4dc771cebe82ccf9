// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "recruit leads") should be domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseRegistrySearch, BaseMatchFinder)

use anyhow::Result;
use async_trait::async_trait;

use apollo_client::{EnrichRequest, MatchResult};
use neverbounce_client::Verification;
use nppes_client::RegistryProvider;

// =============================================================================
// Registry Search Trait (Infrastructure - NPPES public registry)
// =============================================================================

#[async_trait]
pub trait BaseRegistrySearch: Send + Sync {
    /// Search the registry for individual providers by location and specialty.
    /// Returns normalized records, paginated internally up to `limit`.
    async fn search_providers(
        &self,
        city: &str,
        state: Option<&str>,
        specialty: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RegistryProvider>>;

    /// Look up a single provider by NPI number.
    async fn lookup_by_npi(&self, npi: &str) -> Result<Option<RegistryProvider>>;
}

// =============================================================================
// Match Finder Trait (Infrastructure - contact enrichment)
// =============================================================================

#[async_trait]
pub trait BaseMatchFinder: Send + Sync {
    /// Find contact details for one person. `Ok(None)` means no usable match.
    async fn enrich_person(&self, request: &EnrichRequest) -> Result<Option<MatchResult>>;

    /// Enrich a batch; each slot is `None` when no match was found or the
    /// lookup failed. Output preserves input order.
    async fn enrich_many(&self, requests: &[EnrichRequest]) -> Vec<Option<MatchResult>>;
}

// =============================================================================
// Email Verifier Trait (Infrastructure - deliverability checks)
// =============================================================================

#[async_trait]
pub trait BaseEmailVerifier: Send + Sync {
    /// Verify one address. Never fails; check errors degrade to a
    /// `Verification` with status `error`.
    async fn verify_email(&self, email: &str) -> Verification;

    /// Verify a batch of addresses, preserving input order.
    async fn verify_many(&self, emails: &[String]) -> Vec<Verification>;
}
