//! Test harness with testcontainers for integration testing.
//!
//! A single Postgres container is shared across the whole test run; each test
//! gets its own freshly migrated database inside it. The credit ledger is a
//! singleton row, so tests cannot share a database without interfering.

use anyhow::{Context, Result};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    /// Connection URL without a database path.
    base_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    /// Initialize shared infrastructure. This is called once on the first test.
    async fn init() -> Result<Self> {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let base_url = format!("postgresql://postgres:postgres@{}:{}", pg_host, pg_port);

        Ok(Self {
            base_url,
            _postgres: postgres,
        })
    }

    /// Get or initialize the shared infrastructure.
    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// Each test gets its own database in the shared container, migrated from
/// scratch, so ledger state and lead counts are fully isolated.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     // ... test code using ctx.db_pool
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    /// Creates a new test harness backed by a fresh database.
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_name = format!("test_{}", uuid::Uuid::new_v4().simple());
        let admin = PgPool::connect(&format!("{}/postgres", infra.base_url))
            .await
            .context("Failed to connect to admin database")?;
        sqlx::query(&format!(r#"CREATE DATABASE "{}""#, db_name))
            .execute(&admin)
            .await
            .context("Failed to create test database")?;

        let db_pool = PgPool::connect(&format!("{}/{}", infra.base_url, db_name))
            .await
            .context("Failed to connect to test database")?;

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self { db_pool })
    }
}
