//! Row-level access to the `bookings` table.
//!
//! Every function takes a bare connection so it can run inside the caller's
//! transaction. Nothing here touches `trains.seats_remaining`; that belongs
//! to the ledger.

pub mod bookings;
mod rows;
