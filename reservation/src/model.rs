use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TrainId = i64;

/// A train as stored in the ledger.
///
/// `seats_remaining` is only ever written through [`crate::ledger::SeatLedger::adjust`].
/// `capacity` is the seat count the train was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    pub source: String,
    pub destination: String,
    /// Departure label, e.g. "06:00 AM".
    pub time: String,
    pub seats_remaining: u32,
    pub capacity: u32,
}

/// Input for creating a train at bootstrap. Starts with every seat free.
#[derive(Debug, Clone)]
pub struct NewTrain {
    pub name: String,
    pub source: String,
    pub destination: String,
    pub time: String,
    pub capacity: u32,
}

impl NewTrain {
    pub fn new(name: &str, source: &str, destination: &str, time: &str, capacity: u32) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            time: time.to_string(),
            capacity,
        }
    }
}

/// Opaque booking reference handed back to the rider (a PNR).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationCode(String);

impl ReservationCode {
    /// Wraps an already-minted or persisted code without validation.
    pub(crate) fn from_stored(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReservationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lifecycle of a persisted reservation. Transitions only Confirmed -> Cancelled.
/// Rejected bookings are never persisted, so they have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Confirmed" => Ok(ReservationStatus::Confirmed),
            "Cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("invalid reservation status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub code: ReservationCode,
    pub rider: String,
    pub train_id: TrainId,
    pub created_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn is_confirmed(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }
}

/// A reservation joined with the train it was booked on, as shown on a PNR
/// status screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub train_name: String,
    pub source: String,
    pub destination: String,
}
