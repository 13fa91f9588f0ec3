// Database module - provides data access layer

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

// Re-export models for convenience
pub mod models;
pub use models::*;

// Internal modules
mod schema;
mod problem;
mod problemset;
mod record;
mod user;

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (or create) the database at `url`, e.g. `sqlite:/tmp/probank.db`
    /// or `sqlite::memory:`, and initialize the schema.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            // Cascade deletes are declared in the schema; SQLite only
            // enforces them with this pragma on.
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        // Verify connection
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        schema::create_schema(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }

    /// Wipe every table. Test/maintenance use only; children are deleted
    /// first so the wipe does not depend on cascade order.
    pub async fn delete_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for table in [
            "answer_records",
            "options",
            "problems",
            "problem_sets",
            "users",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("all tables wiped");
        Ok(())
    }
}
