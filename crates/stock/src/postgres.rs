use async_trait::async_trait;
use common::Sku;
use sqlx::PgPool;

use crate::{Result, ledger::StockLedger};

/// PostgreSQL-backed stock ledger.
///
/// `reserve` is a single conditional `UPDATE`: the availability check and
/// the decrement happen in one statement, so the ledger stays correct under
/// arbitrary concurrent callers across process instances.
#[derive(Clone)]
pub struct PostgresStockLedger {
    pool: PgPool,
}

impl PostgresStockLedger {
    /// Creates a new PostgreSQL stock ledger.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the stock table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stock_levels (
                sku TEXT PRIMARY KEY,
                available BIGINT NOT NULL CHECK (available >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StockLedger for PostgresStockLedger {
    async fn reserve(&self, sku: &Sku, qty: u32) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE stock_levels
            SET available = available - $2
            WHERE sku = $1 AND available >= $2
            "#,
        )
        .bind(sku.as_str())
        .bind(qty as i64)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, sku: &Sku, qty: u32) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE stock_levels
            SET available = available + $2
            WHERE sku = $1
            "#,
        )
        .bind(sku.as_str())
        .bind(qty as i64)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn available(&self, sku: &Sku) -> Result<Option<u32>> {
        let available: Option<i64> =
            sqlx::query_scalar("SELECT available FROM stock_levels WHERE sku = $1")
                .bind(sku.as_str())
                .fetch_optional(&self.pool)
                .await?;

        Ok(available.map(|qty| qty as u32))
    }

    async fn set_quantity(&self, sku: &Sku, qty: u32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stock_levels (sku, available)
            VALUES ($1, $2)
            ON CONFLICT (sku) DO UPDATE SET available = EXCLUDED.available
            "#,
        )
        .bind(sku.as_str())
        .bind(qty as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
