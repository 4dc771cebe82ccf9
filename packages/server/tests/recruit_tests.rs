//! Integration tests for the recruitment pass.
//!
//! Tests enrichment scheduling, the credit budget, the verifier hook, and the
//! registry-email merge precedence against a real Postgres database with
//! mocked external services.

mod common;

use crate::common::{create_test_lead, init_ledger, match_result, TestHarness};
use leadgen_core::domains::leads::actions::recruit_leads;
use leadgen_core::domains::leads::{ApplyEnrichment, CreditLedger, Lead};
use leadgen_core::kernel::{MockEmailVerifier, MockMatchFinder, TestDependencies};
use neverbounce_client::VerifyStatus;
use test_context::test_context;

// =============================================================================
// Happy path
// =============================================================================

/// A matched email-less lead gets the found email; the whole batch is visited.
#[test_context(TestHarness)]
#[tokio::test]
async fn recruit_enriches_matched_leads(ctx: &TestHarness) {
    create_test_lead(&ctx.db_pool, "2000000001", "Amy", "Wong", None)
        .await
        .unwrap();
    create_test_lead(&ctx.db_pool, "2000000002", "Bob", "Cruz", None)
        .await
        .unwrap();
    create_test_lead(
        &ctx.db_pool,
        "2000000003",
        "Cara",
        "Diaz",
        Some("cdiaz@direct.example.org"),
    )
    .await
    .unwrap();

    let matcher = MockMatchFinder::new().with_match(
        "Amy",
        "Wong",
        match_result("awong@clinic.example.org"),
    );
    let testdeps = TestDependencies::new().mock_matcher(matcher);
    let deps = testdeps.clone().into_deps(ctx.db_pool.clone());

    let result = recruit_leads("Novi", None, 10, &deps).await.unwrap();

    assert_eq!(result.enriched_count, 1);
    // Cara came in with an email, Amy just got one.
    assert_eq!(result.returned_count, 2);
    assert_eq!(result.remaining_credits, 98);
    assert_eq!(testdeps.matcher.call_count(), 2);

    let amy = Lead::find_by_npi("2000000001", &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(amy.email.as_deref(), Some("awong@clinic.example.org"));
    assert!(amy.has_email);
    assert!(amy.visited);
    assert!(amy.apollo_searched);
    assert_eq!(amy.apollo_email.as_deref(), Some("awong@clinic.example.org"));
    assert_eq!(amy.enrichment_status, "apollo_enriched");
    assert!(amy.last_enriched_at.is_some());

    let bob = Lead::find_by_npi("2000000002", &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob.email, None);
    assert!(bob.visited);
    assert!(bob.apollo_searched);
    assert_eq!(bob.enrichment_status, "scout_only");

    // With-email records are never sent to the match engine.
    let cara = Lead::find_by_npi("2000000003", &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert!(cara.visited);
    assert!(!cara.apollo_searched);
}

/// A city with no unvisited candidates spends nothing and returns nothing new.
#[test_context(TestHarness)]
#[tokio::test]
async fn recruit_with_no_candidates_is_a_no_op(ctx: &TestHarness) {
    let testdeps = TestDependencies::new();
    let deps = testdeps.clone().into_deps(ctx.db_pool.clone());

    let result = recruit_leads("Novi", None, 10, &deps).await.unwrap();

    assert_eq!(result.enriched_count, 0);
    assert_eq!(result.returned_count, 0);
    assert_eq!(result.remaining_credits, 100);
    assert_eq!(testdeps.matcher.call_count(), 0);
}

// =============================================================================
// Credit budget
// =============================================================================

/// With 2 credits and 5 email-less candidates, exactly 2 reach the match
/// engine, but all 5 are marked visited.
#[test_context(TestHarness)]
#[tokio::test]
async fn recruit_truncates_batch_to_remaining_credit(ctx: &TestHarness) {
    let npis = [
        "2000000010",
        "2000000011",
        "2000000012",
        "2000000013",
        "2000000014",
    ];
    for npi in &npis {
        create_test_lead(&ctx.db_pool, npi, "Lee", npi, None)
            .await
            .unwrap();
    }

    let testdeps = TestDependencies::new().with_credit_cap(2);
    let deps = testdeps.clone().into_deps(ctx.db_pool.clone());

    recruit_leads("Novi", None, 10, &deps).await.unwrap();

    assert_eq!(testdeps.matcher.call_count(), 2);
    assert_eq!(Lead::searched_count(&ctx.db_pool).await.unwrap(), 2);
    assert_eq!(CreditLedger::remaining(&ctx.db_pool).await.unwrap(), 0);

    for npi in &npis {
        let lead = Lead::find_by_npi(npi, &ctx.db_pool).await.unwrap().unwrap();
        assert!(lead.visited, "lead {} should be visited", npi);
    }
}

/// Credit spend accumulates across passes and never exceeds the cap.
#[test_context(TestHarness)]
#[tokio::test]
async fn recruit_never_exceeds_cap_across_passes(ctx: &TestHarness) {
    create_test_lead(&ctx.db_pool, "2000000020", "Ana", "Ito", None)
        .await
        .unwrap();
    create_test_lead(&ctx.db_pool, "2000000021", "Ben", "Oz", None)
        .await
        .unwrap();

    let testdeps = TestDependencies::new().with_credit_cap(3);
    let deps = testdeps.clone().into_deps(ctx.db_pool.clone());

    let first = recruit_leads("Novi", None, 10, &deps).await.unwrap();
    assert_eq!(first.remaining_credits, 1);

    create_test_lead(&ctx.db_pool, "2000000022", "Cy", "Park", None)
        .await
        .unwrap();
    create_test_lead(&ctx.db_pool, "2000000023", "Dee", "Quinn", None)
        .await
        .unwrap();

    let second = recruit_leads("Novi", None, 10, &deps).await.unwrap();
    assert_eq!(second.remaining_credits, 0);

    assert_eq!(testdeps.matcher.call_count(), 3);
    assert_eq!(Lead::searched_count(&ctx.db_pool).await.unwrap(), 3);
}

/// Two concurrent reservations against one ledger row grant exactly the cap.
#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_reserves_never_exceed_cap(ctx: &TestHarness) {
    init_ledger(5, &ctx.db_pool).await.unwrap();

    let (a, b) = tokio::join!(
        CreditLedger::reserve(3, &ctx.db_pool),
        CreditLedger::reserve(3, &ctx.db_pool)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a + b, 5);
    assert_eq!(CreditLedger::remaining(&ctx.db_pool).await.unwrap(), 0);
}

// =============================================================================
// Monotonic flags
// =============================================================================

/// A second pass over the same city finds nothing unvisited and spends nothing.
#[test_context(TestHarness)]
#[tokio::test]
async fn recruit_never_revisits_leads(ctx: &TestHarness) {
    create_test_lead(&ctx.db_pool, "2000000030", "Amy", "Wong", None)
        .await
        .unwrap();

    let matcher = MockMatchFinder::new().with_match(
        "Amy",
        "Wong",
        match_result("awong@clinic.example.org"),
    );
    let testdeps = TestDependencies::new().mock_matcher(matcher);
    let deps = testdeps.clone().into_deps(ctx.db_pool.clone());

    let first = recruit_leads("Novi", None, 10, &deps).await.unwrap();
    let second = recruit_leads("Novi", None, 10, &deps).await.unwrap();

    assert_eq!(first.enriched_count, 1);
    assert_eq!(second.enriched_count, 0);
    assert_eq!(testdeps.matcher.call_count(), 1);

    let lead = Lead::find_by_npi("2000000030", &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert!(lead.visited);
    assert!(lead.apollo_searched);
}

// =============================================================================
// Email verification
// =============================================================================

/// A configured verifier runs on every found address and its verdict lands on
/// the record.
#[test_context(TestHarness)]
#[tokio::test]
async fn recruit_records_verifier_verdict(ctx: &TestHarness) {
    create_test_lead(&ctx.db_pool, "2000000040", "Amy", "Wong", None)
        .await
        .unwrap();

    let matcher = MockMatchFinder::new().with_match(
        "Amy",
        "Wong",
        match_result("awong@risky.example.org"),
    );
    let verifier =
        MockEmailVerifier::new().with_status("awong@risky.example.org", VerifyStatus::Invalid);
    let testdeps = TestDependencies::new()
        .mock_matcher(matcher)
        .mock_verifier(verifier);
    let deps = testdeps.clone().into_deps(ctx.db_pool.clone());

    recruit_leads("Novi", None, 10, &deps).await.unwrap();

    assert!(testdeps.verifier.was_verified("awong@risky.example.org"));

    let lead = Lead::find_by_npi("2000000040", &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    // The address is stored either way; the verdict says what it is worth.
    assert_eq!(lead.email.as_deref(), Some("awong@risky.example.org"));
    assert_eq!(lead.email_valid, Some(false));
    let verification = lead.email_verification.unwrap();
    assert_eq!(verification["status"], "invalid");
}

/// Without a verifier the address is stored with validity unknown.
#[test_context(TestHarness)]
#[tokio::test]
async fn recruit_without_verifier_leaves_validity_unknown(ctx: &TestHarness) {
    create_test_lead(&ctx.db_pool, "2000000041", "Amy", "Wong", None)
        .await
        .unwrap();

    let matcher = MockMatchFinder::new().with_match(
        "Amy",
        "Wong",
        match_result("awong@clinic.example.org"),
    );
    let testdeps = TestDependencies::new().mock_matcher(matcher).no_verifier();
    let deps = testdeps.into_deps(ctx.db_pool.clone());

    recruit_leads("Novi", None, 10, &deps).await.unwrap();

    let lead = Lead::find_by_npi("2000000041", &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.email.as_deref(), Some("awong@clinic.example.org"));
    assert_eq!(lead.email_valid, None);
    assert_eq!(lead.email_verification, None);
}

// =============================================================================
// Merge precedence
// =============================================================================

/// An enrichment hit never overwrites a registry-sourced email.
#[test_context(TestHarness)]
#[tokio::test]
async fn enrichment_never_overwrites_registry_email(ctx: &TestHarness) {
    create_test_lead(
        &ctx.db_pool,
        "2000000050",
        "Amy",
        "Wong",
        Some("awong@direct.example.org"),
    )
    .await
    .unwrap();

    let update = ApplyEnrichment {
        npi: "2000000050".to_string(),
        email: Some("awong@apollo.example.org".to_string()),
        email_status: Some("verified".to_string()),
        confidence: Some(0.9),
        organization: Some("Novi Family Practice".to_string()),
        linkedin_url: None,
        phone_numbers: vec![],
        website_url: None,
        email_valid: None,
        verification: None,
    };
    let lead = Lead::apply_enrichment(update, &ctx.db_pool).await.unwrap();

    assert_eq!(lead.email.as_deref(), Some("awong@direct.example.org"));
    assert!(lead.has_email);
    // The found address is still kept in the enrichment columns.
    assert_eq!(lead.apollo_email.as_deref(), Some("awong@apollo.example.org"));
    assert_eq!(lead.enrichment_status, "apollo_enriched");
}

/// An empty enrichment email neither clears the stored email nor sets one.
#[test_context(TestHarness)]
#[tokio::test]
async fn enrichment_treats_empty_email_as_missing(ctx: &TestHarness) {
    create_test_lead(&ctx.db_pool, "2000000051", "Bob", "Cruz", None)
        .await
        .unwrap();

    let update = ApplyEnrichment {
        npi: "2000000051".to_string(),
        email: Some(String::new()),
        email_status: None,
        confidence: None,
        organization: None,
        linkedin_url: None,
        phone_numbers: vec![],
        website_url: None,
        email_valid: None,
        verification: None,
    };
    let lead = Lead::apply_enrichment(update, &ctx.db_pool).await.unwrap();

    assert_eq!(lead.email, None);
    assert!(!lead.has_email);
    assert_eq!(lead.apollo_email, None);
}
