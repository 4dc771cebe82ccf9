//! Server dependencies for effects (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! operations. All external services use trait abstractions to enable testing.

use anyhow::Result;
use apollo_client::{ApolloClient, EnrichRequest, MatchResult};
use async_trait::async_trait;
use neverbounce_client::{NeverBounceClient, Verification};
use nppes_client::{NppesClient, RegistryProvider};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::kernel::{BaseEmailVerifier, BaseMatchFinder, BaseRegistrySearch};

// =============================================================================
// NppesClient Adapter (implements BaseRegistrySearch trait)
// =============================================================================

/// Wrapper around NppesClient that implements BaseRegistrySearch trait
pub struct NppesAdapter(pub Arc<NppesClient>);

impl NppesAdapter {
    pub fn new(client: Arc<NppesClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseRegistrySearch for NppesAdapter {
    async fn search_providers(
        &self,
        city: &str,
        state: Option<&str>,
        specialty: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RegistryProvider>> {
        self.0
            .search_providers(city, state, specialty, limit)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn lookup_by_npi(&self, npi: &str) -> Result<Option<RegistryProvider>> {
        self.0
            .lookup_by_npi(npi)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ApolloClient Adapter (implements BaseMatchFinder trait)
// =============================================================================

/// Wrapper around ApolloClient that implements BaseMatchFinder trait
pub struct ApolloAdapter(pub Arc<ApolloClient>);

impl ApolloAdapter {
    pub fn new(client: Arc<ApolloClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseMatchFinder for ApolloAdapter {
    async fn enrich_person(&self, request: &EnrichRequest) -> Result<Option<MatchResult>> {
        self.0
            .enrich_person_by_name(request)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn enrich_many(&self, requests: &[EnrichRequest]) -> Vec<Option<MatchResult>> {
        self.0.enrich_many(requests).await
    }
}

// =============================================================================
// NeverBounceClient Adapter (implements BaseEmailVerifier trait)
// =============================================================================

/// Wrapper around NeverBounceClient that implements BaseEmailVerifier trait
pub struct NeverBounceAdapter(pub Arc<NeverBounceClient>);

impl NeverBounceAdapter {
    pub fn new(client: Arc<NeverBounceClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseEmailVerifier for NeverBounceAdapter {
    async fn verify_email(&self, email: &str) -> Verification {
        self.0.verify_email(email).await
    }

    async fn verify_many(&self, emails: &[String]) -> Vec<Verification> {
        self.0.verify_many(emails).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to domain operations (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub registry: Arc<dyn BaseRegistrySearch>,
    pub matcher: Arc<dyn BaseMatchFinder>,
    /// Email verifier is optional; without it, enriched addresses are
    /// accepted unverified.
    pub verifier: Option<Arc<dyn BaseEmailVerifier>>,
    /// Lifetime cap on enrichment lookups charged against the credit ledger.
    pub credit_cap: i64,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        registry: Arc<dyn BaseRegistrySearch>,
        matcher: Arc<dyn BaseMatchFinder>,
        verifier: Option<Arc<dyn BaseEmailVerifier>>,
        credit_cap: i64,
    ) -> Self {
        Self {
            db_pool,
            registry,
            matcher,
            verifier,
            credit_cap,
        }
    }

    /// Wire up real upstream clients from configuration.
    pub fn from_config(config: &Config, db_pool: PgPool) -> Result<Self> {
        let registry = NppesAdapter::new(Arc::new(NppesClient::new()?));
        let matcher = ApolloAdapter::new(Arc::new(ApolloClient::new(&config.apollo_api_key)?));
        let verifier = match &config.neverbounce_api_key {
            Some(key) => Some(Arc::new(NeverBounceAdapter::new(Arc::new(
                NeverBounceClient::new(key)?,
            ))) as Arc<dyn BaseEmailVerifier>),
            None => None,
        };

        Ok(Self {
            db_pool,
            registry: Arc::new(registry),
            matcher: Arc::new(matcher),
            verifier,
            credit_cap: config.apollo_credit_cap,
        })
    }
}
