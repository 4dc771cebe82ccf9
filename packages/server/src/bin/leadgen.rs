//! Lead pipeline CLI
//!
//! One binary for the whole pipeline: migrate, load from the registry,
//! recruit within the credit budget, and inspect stored leads. All command
//! output is JSON on stdout; logs go to stderr via tracing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadgen_core::domains::leads::actions::queries::{city_stats, lookup_npi, search_leads};
use leadgen_core::domains::leads::actions::{bulk_load_leads, recruit_leads};
use leadgen_core::domains::leads::CreditLedger;
use leadgen_core::kernel::ServerDeps;
use leadgen_core::Config;

#[derive(Parser)]
#[command(name = "leadgen")]
#[command(about = "Healthcare provider lead pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations and initialize the credit ledger
    Migrate,

    /// Load providers from the public registry into the leads table
    Load {
        city: String,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Recruit leads ready for outreach, enriching within the credit budget
    Recruit {
        city: String,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long, default_value_t = 10)]
        count: i64,
    },

    /// List stored leads by city and/or predicted system
    Search {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        emr_system: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// Look up one provider by NPI, stored and upstream
    Lookup { npi: String },

    /// Rollup counts for a city plus the credit position
    Stats { city: String },
}

#[derive(Serialize)]
struct MigrateResponse {
    success: bool,
    message: String,
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,leadgen_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect(&config).await?;

    match cli.command {
        Commands::Migrate => {
            output(&MigrateResponse {
                success: true,
                message: "Migrations applied".to_string(),
            })?;
        }
        Commands::Load {
            city,
            state,
            specialty,
            limit,
        } => {
            let deps = ServerDeps::from_config(&config, pool)?;
            let result = bulk_load_leads(
                &city,
                state.as_deref(),
                specialty.as_deref(),
                limit,
                &deps,
            )
            .await?;
            output(&result)?;
        }
        Commands::Recruit {
            city,
            specialty,
            count,
        } => {
            let deps = ServerDeps::from_config(&config, pool)?;
            let result = recruit_leads(&city, specialty.as_deref(), count, &deps).await?;
            output(&result)?;
        }
        Commands::Search {
            city,
            emr_system,
            limit,
            offset,
        } => {
            let deps = ServerDeps::from_config(&config, pool)?;
            let page = search_leads(
                city.as_deref(),
                emr_system.as_deref(),
                limit,
                offset,
                &deps,
            )
            .await?;
            output(&page)?;
        }
        Commands::Lookup { npi } => {
            let deps = ServerDeps::from_config(&config, pool)?;
            let lookup = lookup_npi(&npi, &deps).await?;
            output(&lookup)?;
        }
        Commands::Stats { city } => {
            let deps = ServerDeps::from_config(&config, pool)?;
            let report = city_stats(&city, &deps).await?;
            output(&report)?;
        }
    }

    Ok(())
}

/// Connect, migrate, and make sure the credit ledger row exists.
async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    CreditLedger::ensure(config.apollo_credit_cap, &pool).await?;

    Ok(pool)
}
