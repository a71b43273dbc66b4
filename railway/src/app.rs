use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use reservation::code::RandomCodeSource;
use reservation::db::Db;
use reservation::ledger::SqliteLedger;
use reservation::{ReservationAllocator, Train};

use crate::config::AppConfig;

/// Process-owned store handle and the allocator built on top of it.
pub struct App {
    pub db: Db,
    pub allocator: ReservationAllocator,
}

impl App {
    /// Opens the store, bootstraps the schema, optionally seeds the sample
    /// timetable and refuses to start if seat accounting does not add up.
    pub async fn start(cfg: &AppConfig) -> anyhow::Result<Self> {
        let db = Db::connect(&cfg.database_url, cfg.max_connections).await?;
        db.migrate().await.context("schema bootstrap failed")?;

        if cfg.seed_sample_trains {
            db.seed_sample_trains()
                .await
                .context("seeding sample trains failed")?;
        }

        let allocator = ReservationAllocator::new(
            db.pool.clone(),
            Arc::new(SqliteLedger::new()),
            Arc::new(RandomCodeSource::from_entropy()),
            cfg.max_code_attempts,
        );

        let trains = allocator
            .audit()
            .await
            .context("seat conservation audit failed")?;
        info!(trains, database_url = %cfg.database_url, "reservation store ready");

        Ok(Self { db, allocator })
    }

    pub async fn shutdown(self) {
        self.db.close().await;
        info!("reservation store closed");
    }
}

/// Plain-text timetable: id, name, source, destination, time, seats.
pub fn render_trains(trains: &[Train]) -> String {
    let header = format!(
        "{:<8} {:<20} {:<12} {:<12} {:<10} {:>5}",
        "Train ID", "Name", "Source", "Destination", "Time", "Seats"
    );

    std::iter::once(header)
        .chain(trains.iter().map(|t| {
            format!(
                "{:<8} {:<20} {:<12} {:<12} {:<10} {:>5}",
                t.id, t.name, t.source, t.destination, t.time, t.seats_remaining
            )
        }))
        .map(|line| line + "\n")
        .collect()
}
