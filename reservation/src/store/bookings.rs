use sqlx::SqliteConnection;

use super::rows::{row_to_details, row_to_reservation};
use crate::error::ReservationError;
use crate::model::{Reservation, ReservationDetails, ReservationStatus};

pub async fn code_exists(conn: &mut SqliteConnection, code: &str) -> Result<bool, ReservationError> {
    let hit = sqlx::query("SELECT 1 FROM bookings WHERE code = ?")
        .bind(code)
        .fetch_optional(conn)
        .await?;

    Ok(hit.is_some())
}

/// Inserts a new reservation row. The code must not exist yet.
pub async fn insert(
    conn: &mut SqliteConnection,
    reservation: &Reservation,
) -> Result<(), ReservationError> {
    sqlx::query(
        r#"
INSERT INTO bookings (code, rider, train_id, created_at, status)
VALUES (?, ?, ?, ?, ?);
"#,
    )
    .bind(reservation.code.as_str())
    .bind(&reservation.rider)
    .bind(reservation.train_id)
    .bind(reservation.created_at)
    .bind(reservation.status.to_string())
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn fetch_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<Reservation>, ReservationError> {
    let row = sqlx::query(
        r#"
SELECT code, rider, train_id, created_at, status
FROM bookings
WHERE code = ?;
"#,
    )
    .bind(code)
    .fetch_optional(conn)
    .await?;

    row.as_ref().map(row_to_reservation).transpose()
}

pub async fn fetch_details(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Option<ReservationDetails>, ReservationError> {
    let row = sqlx::query(
        r#"
SELECT
  b.code, b.rider, b.train_id, b.created_at, b.status,
  t.name AS train_name, t.source, t.destination
FROM bookings b
JOIN trains t ON b.train_id = t.id
WHERE b.code = ?;
"#,
    )
    .bind(code)
    .fetch_optional(conn)
    .await?;

    row.as_ref().map(row_to_details).transpose()
}

/// Flips a Confirmed reservation to Cancelled.
///
/// Returns false if no Confirmed row with that code exists, so a repeated
/// cancel cannot flip the same row twice.
pub async fn mark_cancelled(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<bool, ReservationError> {
    let res = sqlx::query("UPDATE bookings SET status = ? WHERE code = ? AND status = ?")
        .bind(ReservationStatus::Cancelled.to_string())
        .bind(code)
        .bind(ReservationStatus::Confirmed.to_string())
        .execute(conn)
        .await?;

    Ok(res.rows_affected() == 1)
}

/// All reservations on one train, oldest first.
pub async fn for_train(
    conn: &mut SqliteConnection,
    train_id: i64,
) -> Result<Vec<Reservation>, ReservationError> {
    let rows = sqlx::query(
        r#"
SELECT code, rider, train_id, created_at, status
FROM bookings
WHERE train_id = ?
ORDER BY created_at, code;
"#,
    )
    .bind(train_id)
    .fetch_all(conn)
    .await?;

    rows.iter().map(row_to_reservation).collect()
}
