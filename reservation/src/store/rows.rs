use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::error::ReservationError;
use crate::model::{Reservation, ReservationCode, ReservationDetails, ReservationStatus};

/* =========================
Row mapping
========================= */

pub(crate) fn row_to_reservation(r: &SqliteRow) -> Result<Reservation, ReservationError> {
    let status_str: String = r.try_get("status")?;
    let status = ReservationStatus::from_str(&status_str).map_err(ReservationError::Decode)?;

    let created_at: DateTime<Utc> = r.try_get("created_at")?;

    Ok(Reservation {
        code: ReservationCode::from_stored(r.try_get("code")?),
        rider: r.try_get("rider")?,
        train_id: r.try_get("train_id")?,
        created_at,
        status,
    })
}

pub(crate) fn row_to_details(r: &SqliteRow) -> Result<ReservationDetails, ReservationError> {
    Ok(ReservationDetails {
        reservation: row_to_reservation(r)?,
        train_name: r.try_get("train_name")?,
        source: r.try_get("source")?,
        destination: r.try_get("destination")?,
    })
}
