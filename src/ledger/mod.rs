pub mod error;
pub use error::{LedgerError, LedgerErrorKind};

use sqlx::{PgPool, Postgres, Transaction};


/// Persistent record of applied migrations, plus the machinery that runs
/// new SQL against the database.
///
/// The `migration` table holds one row per applied file. Rows always form
/// a prefix of the sorted file list; the `UNIQUE` constraint on `name` is
/// the only guard against two runners racing each other.
pub struct Ledger {
    pool: PgPool,
}

impl Ledger {
    pub async fn connect(conn_str: &str) -> Result<Self, LedgerError> {
        let pool = PgPool::connect(conn_str).await?;
        Ok(Ledger { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Ledger { pool }
    }

    /// Idempotently creates the ledger table.
    pub async fn ensure_schema(&self) -> Result<(), LedgerError> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS migration (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );
        "#)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The most recently recorded migration, or `None` for an empty ledger.
    pub async fn last_applied(&self) -> Result<Option<(i64, String)>, LedgerError> {
        Ok(sqlx::query_as(
            "SELECT id, name FROM migration ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Applies an ordered batch of (name, sql) pairs.
    ///
    /// With `use_transaction` the whole batch commits or rolls back as one
    /// unit. Without it each file commits on its own, so statements that
    /// refuse to run inside a transaction block (CREATE DATABASE and
    /// friends) can still be migrated; a failure then leaves every earlier
    /// file permanently applied.
    pub async fn apply(
        &self,
        batch: &[(String, String)],
        use_transaction: bool,
    ) -> Result<Vec<String>, LedgerError> {
        if use_transaction {
            self.apply_transactional(batch).await
        } else {
            self.apply_autocommit(batch).await
        }
    }

    async fn apply_transactional(
        &self,
        batch: &[(String, String)],
    ) -> Result<Vec<String>, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let mut applied = Vec::with_capacity(batch.len());

        for (name, sql) in batch {
            if let Err(source) = Self::apply_one(&mut tx, name, sql).await {
                if let Err(e) = tx.rollback().await {
                    // Dropping the transaction aborts it either way.
                    tracing::warn!("Failed to roll back transaction: {e}");
                }
                return Err(LedgerError::apply(name, Vec::new(), true, source));
            }

            tracing::info!("Applied migration {name}");
            applied.push(name.clone());
        }

        tx.commit().await?;
        Ok(applied)
    }

    async fn apply_one(
        tx: &mut Transaction<'static, Postgres>,
        name: &str,
        sql: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO migration (name) VALUES ($1)")
            .bind(name)
            .execute(&mut **tx)
            .await?;

        sqlx::raw_sql(sql)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn apply_autocommit(
        &self,
        batch: &[(String, String)],
    ) -> Result<Vec<String>, LedgerError> {
        let mut applied = Vec::with_capacity(batch.len());

        for (name, sql) in batch {
            if let Err(source) = sqlx::query("INSERT INTO migration (name) VALUES ($1)")
                .bind(name)
                .execute(&self.pool)
                .await
            {
                return Err(LedgerError::apply(name, applied, false, source));
            }

            if let Err(source) = sqlx::raw_sql(sql).execute(&self.pool).await {
                // The record committed before its SQL failed. Take it back
                // out so the ledger only ever lists fully applied files.
                if let Err(e) = sqlx::query("DELETE FROM migration WHERE name = $1")
                    .bind(name)
                    .execute(&self.pool)
                    .await
                {
                    tracing::warn!("Failed to remove ledger record for {name}: {e}");
                }
                return Err(LedgerError::apply(name, applied, false, source));
            }

            tracing::info!("Applied migration {name}");
            applied.push(name.clone());
        }

        Ok(applied)
    }
}
