//! Reservation core: a seat ledger per train and an allocator that books and
//! cancels reservations against it, one SQLite transaction per operation.

pub mod allocator;
pub mod code;
pub mod db;
pub mod error;
pub mod ledger;
pub mod model;
pub mod store;

pub use allocator::{DEFAULT_MAX_CODE_ATTEMPTS, ReservationAllocator};
pub use error::{LedgerError, ReservationError};
pub use model::{
    NewTrain, Reservation, ReservationCode, ReservationDetails, ReservationStatus, Train, TrainId,
};
