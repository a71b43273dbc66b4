use std::sync::Arc;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{Span, debug, field, info, instrument, warn};

use crate::code::{CodeSource, RandomCodeSource};
use crate::error::ReservationError;
use crate::ledger::{SeatLedger, SqliteLedger};
use crate::model::{
    Reservation, ReservationCode, ReservationDetails, ReservationStatus, Train, TrainId,
};
use crate::store::bookings;

/// Collision retries allowed when minting one reservation code.
pub const DEFAULT_MAX_CODE_ATTEMPTS: u32 = 10;

// Takes the write lock up front. A deferred transaction that reads before it
// writes gets SQLITE_BUSY instead of waiting when another connection is mid-write.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Books and cancels reservations.
///
/// Each `book` and `cancel` runs in one SQLite transaction that covers both
/// the `bookings` row and the ledger adjustment. Any error drops the
/// transaction, which rolls back everything written so far. Transactions
/// start immediate, so overlapping calls on separate pool connections wait
/// for each other instead of failing.
pub struct ReservationAllocator {
    pool: SqlitePool,
    ledger: Arc<dyn SeatLedger>,
    codes: Arc<dyn CodeSource>,
    max_code_attempts: u32,
}

impl ReservationAllocator {
    pub fn new(
        pool: SqlitePool,
        ledger: Arc<dyn SeatLedger>,
        codes: Arc<dyn CodeSource>,
        max_code_attempts: u32,
    ) -> Self {
        Self {
            pool,
            ledger,
            codes,
            max_code_attempts,
        }
    }

    /// SQLite ledger, entropy-seeded codes, default attempt bound.
    pub fn with_defaults(pool: SqlitePool) -> Self {
        Self::new(
            pool,
            Arc::new(SqliteLedger::new()),
            Arc::new(RandomCodeSource::from_entropy()),
            DEFAULT_MAX_CODE_ATTEMPTS,
        )
    }

    #[instrument(skip(self), target = "allocator", fields(code = field::Empty))]
    pub async fn book(
        &self,
        rider: &str,
        train_id: TrainId,
    ) -> Result<ReservationCode, ReservationError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let seats = self.ledger.available_seats(&mut *tx, train_id).await?;
        if seats == 0 {
            info!("booking rejected: no seats");
            return Err(ReservationError::NoSeats { train_id });
        }

        let code = self.mint_code(&mut *tx).await?;
        Span::current().record("code", field::display(&code));

        let reservation = Reservation {
            code,
            rider: rider.to_string(),
            train_id,
            created_at: Utc::now(),
            status: ReservationStatus::Confirmed,
        };

        bookings::insert(&mut *tx, &reservation).await?;
        let left = self.ledger.adjust(&mut *tx, train_id, -1).await?;

        tx.commit().await?;

        info!(seats_left = left, "booking confirmed");
        Ok(reservation.code)
    }

    #[instrument(skip(self), target = "allocator")]
    pub async fn cancel(&self, rider: &str, code: &str) -> Result<(), ReservationError> {
        if ReservationCode::parse(code).is_none() {
            debug!(code, "malformed reservation code");
            return Err(ReservationError::NotFound {
                code: code.to_string(),
            });
        }

        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let reservation = bookings::fetch_by_code(&mut *tx, code)
            .await?
            .ok_or_else(|| ReservationError::NotFound {
                code: code.to_string(),
            })?;

        if reservation.rider != rider {
            warn!("cancel attempted by non-owner");
            return Err(ReservationError::NotOwner {
                code: code.to_string(),
            });
        }

        if !reservation.is_confirmed() || !bookings::mark_cancelled(&mut *tx, code).await? {
            return Err(ReservationError::AlreadyCancelled {
                code: code.to_string(),
            });
        }

        let left = self
            .ledger
            .adjust(&mut *tx, reservation.train_id, 1)
            .await?;

        tx.commit().await?;

        info!(
            train_id = reservation.train_id,
            seats_left = left,
            "reservation cancelled"
        );
        Ok(())
    }

    /// Reservation owned by `rider`. Someone else's code is reported as not found.
    pub async fn lookup(&self, rider: &str, code: &str) -> Result<Reservation, ReservationError> {
        let not_found = || ReservationError::NotFound {
            code: code.to_string(),
        };

        if ReservationCode::parse(code).is_none() {
            debug!(code, "malformed reservation code");
            return Err(not_found());
        }

        let mut conn = self.pool.acquire().await?;
        bookings::fetch_by_code(&mut *conn, code)
            .await?
            .filter(|r| r.rider == rider)
            .ok_or_else(not_found)
    }

    /// Same ownership rule as [`Self::lookup`], joined with the train.
    pub async fn lookup_details(
        &self,
        rider: &str,
        code: &str,
    ) -> Result<ReservationDetails, ReservationError> {
        let not_found = || ReservationError::NotFound {
            code: code.to_string(),
        };

        if ReservationCode::parse(code).is_none() {
            return Err(not_found());
        }

        let mut conn = self.pool.acquire().await?;
        bookings::fetch_details(&mut *conn, code)
            .await?
            .filter(|d| d.reservation.rider == rider)
            .ok_or_else(not_found)
    }

    pub async fn available_seats(&self, train_id: TrainId) -> Result<u32, ReservationError> {
        let mut conn = self.pool.acquire().await?;
        Ok(self.ledger.available_seats(&mut *conn, train_id).await?)
    }

    pub async fn list_trains(&self) -> Result<Vec<Train>, ReservationError> {
        let mut conn = self.pool.acquire().await?;
        Ok(self.ledger.list_trains(&mut *conn).await?)
    }

    /// Runs the seat-conservation audit on every train. Returns the first violation.
    #[instrument(skip(self), target = "allocator")]
    pub async fn audit(&self) -> Result<usize, ReservationError> {
        let mut conn = self.pool.acquire().await?;
        let trains = self.ledger.list_trains(&mut *conn).await?;

        for t in &trains {
            self.ledger.audit(&mut *conn, t.id).await?;
        }

        debug!(trains = trains.len(), "seat conservation holds");
        Ok(trains.len())
    }

    /// Draws candidates until one is unused, at most `max_code_attempts` times.
    async fn mint_code(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<ReservationCode, ReservationError> {
        for attempt in 0..self.max_code_attempts {
            let candidate = self.codes.next_candidate(attempt);
            if !bookings::code_exists(conn, candidate.as_str()).await? {
                return Ok(candidate);
            }
            debug!(attempt, code = %candidate, "reservation code collision");
        }

        warn!(
            attempts = self.max_code_attempts,
            "reservation code space exhausted"
        );
        Err(ReservationError::CodeSpaceExhausted {
            attempts: self.max_code_attempts,
        })
    }
}
