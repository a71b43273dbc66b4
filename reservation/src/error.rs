use thiserror::Error;

use crate::model::TrainId;

/// Failures of the seat ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("train {train_id} not found")]
    NotFound { train_id: TrainId },

    #[error("no seats left on train {train_id}")]
    Exhausted { train_id: TrainId },

    /// Seat accounting does not add up. Never expected under correct operation.
    #[error("seat ledger inconsistent for train {train_id}: {detail}")]
    Inconsistent { train_id: TrainId, detail: String },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Errors returned by the reservation allocator to the presentation layer.
#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("train {train_id} not found")]
    TrainNotFound { train_id: TrainId },

    #[error("reservation {code} not found or not yours")]
    NotFound { code: String },

    /// Another rider's reservation. Displays exactly like `NotFound` so the
    /// message does not reveal that the code exists.
    #[error("reservation {code} not found or not yours")]
    NotOwner { code: String },

    #[error("no seats available on train {train_id}")]
    NoSeats { train_id: TrainId },

    #[error("reservation {code} is already cancelled")]
    AlreadyCancelled { code: String },

    #[error("could not generate a unique reservation code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("seat ledger inconsistent: {0}")]
    Inconsistent(String),

    #[error("malformed stored row: {0}")]
    Decode(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ReservationError {
    /// True for every error a rider should see as "not found": unknown train,
    /// unknown code, and someone else's code.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ReservationError::TrainNotFound { .. }
                | ReservationError::NotFound { .. }
                | ReservationError::NotOwner { .. }
        )
    }
}

impl From<LedgerError> for ReservationError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound { train_id } => ReservationError::TrainNotFound { train_id },
            LedgerError::Exhausted { train_id } => ReservationError::NoSeats { train_id },
            LedgerError::Inconsistent { train_id, detail } => {
                ReservationError::Inconsistent(format!("train {train_id}: {detail}"))
            }
            LedgerError::Storage(e) => ReservationError::Storage(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_owner_reads_like_not_found() {
        let absent = ReservationError::NotFound {
            code: "PNR10001".into(),
        };
        let foreign = ReservationError::NotOwner {
            code: "PNR10001".into(),
        };

        assert_eq!(absent.to_string(), foreign.to_string());
        assert!(absent.is_not_found());
        assert!(foreign.is_not_found());
    }

    #[test]
    fn ledger_exhaustion_surfaces_as_no_seats() {
        let e: ReservationError = LedgerError::Exhausted { train_id: 7 }.into();
        assert!(matches!(e, ReservationError::NoSeats { train_id: 7 }));
    }

    #[test]
    fn ledger_not_found_surfaces_as_train_not_found() {
        let e: ReservationError = LedgerError::NotFound { train_id: 3 }.into();
        assert!(matches!(e, ReservationError::TrainNotFound { train_id: 3 }));
        assert!(e.is_not_found());
    }

    #[test]
    fn inconsistency_keeps_train_and_detail() {
        let e: ReservationError = LedgerError::Inconsistent {
            train_id: 2,
            detail: "51 > capacity 50".into(),
        }
        .into();

        assert!(!e.is_not_found());
        assert_eq!(
            e.to_string(),
            "seat ledger inconsistent: train 2: 51 > capacity 50"
        );
    }
}
