use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Single-row ledger capping total paid match-engine lookups.
///
/// All spend goes through [`CreditLedger::reserve`], a transactional
/// read-modify-write on the row, so concurrent recruiters can never jointly
/// overspend the cap.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CreditLedger {
    pub cap: i64,
    pub spent: i64,
    pub updated_at: DateTime<Utc>,
}

impl CreditLedger {
    /// Create the ledger row if missing; refresh the cap from config otherwise.
    /// Spend already recorded is preserved across cap changes.
    pub async fn ensure(cap: i64, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO credit_ledger (singleton, cap)
            VALUES (TRUE, $1)
            ON CONFLICT (singleton) DO UPDATE SET cap = EXCLUDED.cap
            "#,
        )
        .bind(cap)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Atomically reserve up to `want` credits; returns how many were granted.
    ///
    /// The row lock makes the read-modify-write atomic across processes, so
    /// `spent` never exceeds `cap` no matter how many recruiters race.
    pub async fn reserve(want: i64, pool: &PgPool) -> Result<i64> {
        if want <= 0 {
            return Ok(0);
        }
        let granted: i64 = sqlx::query_scalar(
            r#"
            WITH current AS (
                SELECT cap, spent FROM credit_ledger WHERE singleton FOR UPDATE
            ), reserve AS (
                SELECT LEAST($1, GREATEST(cap - spent, 0)) AS credits FROM current
            )
            UPDATE credit_ledger
            SET spent = credit_ledger.spent + reserve.credits,
                updated_at = NOW()
            FROM reserve
            WHERE credit_ledger.singleton
            RETURNING reserve.credits
            "#,
        )
        .bind(want)
        .fetch_one(pool)
        .await?;
        Ok(granted)
    }

    /// Credits still available under the cap
    pub async fn remaining(pool: &PgPool) -> Result<i64> {
        let remaining: i64 =
            sqlx::query_scalar("SELECT GREATEST(cap - spent, 0) FROM credit_ledger WHERE singleton")
                .fetch_one(pool)
                .await?;
        Ok(remaining)
    }

    /// Total credits consumed so far
    pub async fn spent(pool: &PgPool) -> Result<i64> {
        let spent: i64 = sqlx::query_scalar("SELECT spent FROM credit_ledger WHERE singleton")
            .fetch_one(pool)
            .await?;
        Ok(spent)
    }

    /// Fetch the full ledger row
    pub async fn fetch(pool: &PgPool) -> Result<Self> {
        let ledger = sqlx::query_as::<_, Self>(
            "SELECT cap, spent, updated_at FROM credit_ledger WHERE singleton",
        )
        .fetch_one(pool)
        .await?;
        Ok(ledger)
    }
}
