// TestDependencies - mock implementations for testing
//
// Provides mock upstream services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use apollo_client::{EnrichRequest, MatchResult};
use neverbounce_client::{Verification, VerifyStatus};
use nppes_client::RegistryProvider;

use super::{BaseEmailVerifier, BaseMatchFinder, BaseRegistrySearch, ServerDeps};

// =============================================================================
// Mock Registry Search
// =============================================================================

/// Arguments captured from a registry search call
#[derive(Debug, Clone)]
pub struct SearchCallArgs {
    pub city: String,
    pub state: Option<String>,
    pub specialty: Option<String>,
    pub limit: usize,
}

pub struct MockRegistrySearch {
    responses: Arc<Mutex<Vec<Vec<RegistryProvider>>>>,
    lookups: Arc<Mutex<HashMap<String, RegistryProvider>>>,
    search_calls: Arc<Mutex<Vec<SearchCallArgs>>>,
    search_error: Option<String>,
}

impl MockRegistrySearch {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            lookups: Arc::new(Mutex::new(HashMap::new())),
            search_calls: Arc::new(Mutex::new(Vec::new())),
            search_error: None,
        }
    }

    /// Queue a batch of providers to be returned by the next search
    pub fn with_providers(self, providers: Vec<RegistryProvider>) -> Self {
        self.responses.lock().unwrap().push(providers);
        self
    }

    /// Register a provider to be returned from lookup_by_npi
    pub fn with_lookup(self, provider: RegistryProvider) -> Self {
        self.lookups
            .lock()
            .unwrap()
            .insert(provider.npi.clone(), provider);
        self
    }

    /// Make every search fail with the given message
    pub fn with_search_error(mut self, message: impl Into<String>) -> Self {
        self.search_error = Some(message.into());
        self
    }

    /// Get all search calls with their arguments
    pub fn search_calls(&self) -> Vec<SearchCallArgs> {
        self.search_calls.lock().unwrap().clone()
    }
}

impl Default for MockRegistrySearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRegistrySearch for MockRegistrySearch {
    async fn search_providers(
        &self,
        city: &str,
        state: Option<&str>,
        specialty: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RegistryProvider>> {
        // Record the call with all arguments
        self.search_calls.lock().unwrap().push(SearchCallArgs {
            city: city.to_string(),
            state: state.map(String::from),
            specialty: specialty.map(String::from),
            limit,
        });

        if let Some(message) = &self.search_error {
            anyhow::bail!("{}", message);
        }

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            let mut batch = responses.remove(0);
            batch.truncate(limit);
            Ok(batch)
        } else {
            Ok(Vec::new())
        }
    }

    async fn lookup_by_npi(&self, npi: &str) -> Result<Option<RegistryProvider>> {
        Ok(self.lookups.lock().unwrap().get(npi).cloned())
    }
}

// =============================================================================
// Mock Match Finder
// =============================================================================

pub struct MockMatchFinder {
    matches: Arc<Mutex<HashMap<String, MatchResult>>>,
    calls: Arc<Mutex<Vec<EnrichRequest>>>,
}

impl MockMatchFinder {
    pub fn new() -> Self {
        Self {
            matches: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a match keyed on "First Last"
    pub fn with_match(self, first_name: &str, last_name: &str, result: MatchResult) -> Self {
        self.matches
            .lock()
            .unwrap()
            .insert(format!("{} {}", first_name, last_name), result);
        self
    }

    /// Get all enrich requests that were made
    pub fn calls(&self) -> Vec<EnrichRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of enrichment lookups performed
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn lookup(&self, request: &EnrichRequest) -> Option<MatchResult> {
        let key = format!("{} {}", request.first_name, request.last_name);
        self.matches.lock().unwrap().get(&key).cloned()
    }
}

impl Default for MockMatchFinder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMatchFinder for MockMatchFinder {
    async fn enrich_person(&self, request: &EnrichRequest) -> Result<Option<MatchResult>> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(self.lookup(request))
    }

    async fn enrich_many(&self, requests: &[EnrichRequest]) -> Vec<Option<MatchResult>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            self.calls.lock().unwrap().push(request.clone());
            results.push(self.lookup(request));
        }
        results
    }
}

// =============================================================================
// Mock Email Verifier
// =============================================================================

pub struct MockEmailVerifier {
    statuses: Arc<Mutex<HashMap<String, VerifyStatus>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEmailVerifier {
    pub fn new() -> Self {
        Self {
            statuses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a verdict for an address; unregistered addresses verify as valid
    pub fn with_status(self, email: &str, status: VerifyStatus) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(email.to_string(), status);
        self
    }

    /// Get all addresses that were checked
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if an address was checked
    pub fn was_verified(&self, email: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|e| e == email)
    }
}

impl Default for MockEmailVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmailVerifier for MockEmailVerifier {
    async fn verify_email(&self, email: &str) -> Verification {
        self.calls.lock().unwrap().push(email.to_string());

        let status = self
            .statuses
            .lock()
            .unwrap()
            .get(email)
            .copied()
            .unwrap_or(VerifyStatus::Valid);
        Verification {
            email: email.to_string(),
            status,
            flags: Vec::new(),
            suggested_correction: None,
            execution_time_ms: 1,
            error: None,
        }
    }

    async fn verify_many(&self, emails: &[String]) -> Vec<Verification> {
        let mut results = Vec::with_capacity(emails.len());
        for email in emails {
            results.push(self.verify_email(email).await);
        }
        results
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub registry: Arc<MockRegistrySearch>,
    pub matcher: Arc<MockMatchFinder>,
    pub verifier: Arc<MockEmailVerifier>,
    pub credit_cap: i64,
    verifier_enabled: bool,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(MockRegistrySearch::new()),
            matcher: Arc::new(MockMatchFinder::new()),
            verifier: Arc::new(MockEmailVerifier::new()),
            credit_cap: 100,
            verifier_enabled: true,
        }
    }

    /// Set a mock registry search
    pub fn mock_registry(mut self, registry: MockRegistrySearch) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Set a mock match finder
    pub fn mock_matcher(mut self, matcher: MockMatchFinder) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    /// Set a mock email verifier
    pub fn mock_verifier(mut self, verifier: MockEmailVerifier) -> Self {
        self.verifier = Arc::new(verifier);
        self
    }

    /// Run without an email verifier (enriched addresses accepted unverified)
    pub fn no_verifier(mut self) -> Self {
        self.verifier_enabled = false;
        self
    }

    /// Set the enrichment credit cap
    pub fn with_credit_cap(mut self, cap: i64) -> Self {
        self.credit_cap = cap;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self, db_pool: PgPool) -> ServerDeps {
        let verifier = if self.verifier_enabled {
            Some(self.verifier.clone() as Arc<dyn BaseEmailVerifier>)
        } else {
            None
        };
        ServerDeps::new(
            db_pool,
            self.registry.clone(),
            self.matcher.clone(),
            verifier,
            self.credit_cap,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
