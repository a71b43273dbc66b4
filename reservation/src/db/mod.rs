pub mod schema;
pub mod seed;

use std::str::FromStr;

use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::model::{NewTrain, TrainId};

/// Owns the SQLite pool for the lifetime of the process.
#[derive(Clone)]
pub struct Db {
    pub pool: SqlitePool,
}

impl Db {
    /// Opens (creating if needed) the database at `database_url` with
    /// foreign keys enforced on every connection.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url: {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open database: {database_url}"))?;

        Ok(Self { pool })
    }

    /// Isolated in-memory database with the schema applied.
    ///
    /// Uses a unique shared-cache name so parallel tests never see each
    /// other's tables, and pins one connection open so the database is not
    /// dropped while idle.
    pub async fn connect_in_memory() -> anyhow::Result<Self> {
        let url = format!("sqlite:file:{}?mode=memory&cache=shared", Uuid::new_v4());
        let options = SqliteConnectOptions::from_str(&url)?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        schema::migrate(&self.pool).await
    }

    /// Inserts the sample trains if the table is empty. Returns how many were added.
    pub async fn seed_sample_trains(&self) -> anyhow::Result<usize> {
        seed::seed_sample_trains(&self.pool).await
    }

    pub async fn insert_train(&self, train: &NewTrain) -> anyhow::Result<TrainId> {
        seed::insert_train(&self.pool, train).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
