//! Inventory ledger: the only writer of `trains.seats_remaining`.

pub mod sqlite_ledger;

use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::error::LedgerError;
use crate::model::{Train, TrainId};

pub use sqlite_ledger::SqliteLedger;

/// Seat accounting per train.
///
/// Calls take the connection explicitly so a caller holding a transaction
/// gets the ledger change committed or rolled back together with its own
/// writes.
#[async_trait]
pub trait SeatLedger: Send + Sync {
    /// Applies `delta` to the train's remaining seats and returns the new count.
    ///
    /// Fails with `Exhausted` below zero and `Inconsistent` above capacity.
    async fn adjust(
        &self,
        conn: &mut SqliteConnection,
        train_id: TrainId,
        delta: i64,
    ) -> Result<u32, LedgerError>;

    async fn available_seats(
        &self,
        conn: &mut SqliteConnection,
        train_id: TrainId,
    ) -> Result<u32, LedgerError>;

    async fn train(&self, conn: &mut SqliteConnection, train_id: TrainId)
    -> Result<Train, LedgerError>;

    async fn list_trains(&self, conn: &mut SqliteConnection) -> Result<Vec<Train>, LedgerError>;

    /// Checks `seats_remaining + confirmed bookings == capacity` for one train.
    async fn audit(&self, conn: &mut SqliteConnection, train_id: TrainId)
    -> Result<(), LedgerError>;
}
