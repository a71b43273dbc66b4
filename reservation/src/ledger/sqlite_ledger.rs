use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::{debug, error, instrument};

use super::SeatLedger;
use crate::error::LedgerError;
use crate::model::{ReservationStatus, Train, TrainId};

/// SQLite-backed ledger over the `trains` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteLedger;

impl SqliteLedger {
    pub fn new() -> Self {
        Self
    }

    async fn seat_counts(
        conn: &mut SqliteConnection,
        train_id: TrainId,
    ) -> Result<(u32, u32), LedgerError> {
        let row = sqlx::query("SELECT seats_remaining, capacity FROM trains WHERE id = ?")
            .bind(train_id)
            .fetch_optional(conn)
            .await?
            .ok_or(LedgerError::NotFound { train_id })?;

        let remaining = i64_to_u32(train_id, row.try_get("seats_remaining")?)?;
        let capacity = i64_to_u32(train_id, row.try_get("capacity")?)?;
        Ok((remaining, capacity))
    }
}

#[async_trait]
impl SeatLedger for SqliteLedger {
    #[instrument(skip(self, conn), target = "ledger")]
    async fn adjust(
        &self,
        conn: &mut SqliteConnection,
        train_id: TrainId,
        delta: i64,
    ) -> Result<u32, LedgerError> {
        let (remaining, capacity) = Self::seat_counts(conn, train_id).await?;

        let Some(next) = i64::from(remaining).checked_add(delta) else {
            error!(remaining, "adjust overflows");
            return Err(LedgerError::Inconsistent {
                train_id,
                detail: format!("{remaining} + {delta} overflows"),
            });
        };
        if next < 0 {
            debug!(remaining, "adjust would go below zero");
            return Err(LedgerError::Exhausted { train_id });
        }
        if next > i64::from(capacity) {
            error!(remaining, capacity, "adjust would exceed capacity");
            return Err(LedgerError::Inconsistent {
                train_id,
                detail: format!("{next} seats would exceed capacity {capacity}"),
            });
        }

        // Guarded on the value just read so a concurrent writer cannot be overwritten.
        let res = sqlx::query(
            "UPDATE trains SET seats_remaining = ? WHERE id = ? AND seats_remaining = ?",
        )
        .bind(next)
        .bind(train_id)
        .bind(i64::from(remaining))
        .execute(conn)
        .await?;

        if res.rows_affected() != 1 {
            return Err(LedgerError::Inconsistent {
                train_id,
                detail: format!("seat count changed underneath adjust (expected {remaining})"),
            });
        }

        debug!(from = remaining, to = next, "seats adjusted");
        Ok(next as u32)
    }

    async fn available_seats(
        &self,
        conn: &mut SqliteConnection,
        train_id: TrainId,
    ) -> Result<u32, LedgerError> {
        let (remaining, _) = Self::seat_counts(conn, train_id).await?;
        Ok(remaining)
    }

    async fn train(
        &self,
        conn: &mut SqliteConnection,
        train_id: TrainId,
    ) -> Result<Train, LedgerError> {
        let row = sqlx::query(
            r#"
SELECT id, name, source, destination, time, seats_remaining, capacity
FROM trains
WHERE id = ?;
"#,
        )
        .bind(train_id)
        .fetch_optional(conn)
        .await?
        .ok_or(LedgerError::NotFound { train_id })?;

        row_to_train(&row)
    }

    async fn list_trains(&self, conn: &mut SqliteConnection) -> Result<Vec<Train>, LedgerError> {
        let rows = sqlx::query(
            r#"
SELECT id, name, source, destination, time, seats_remaining, capacity
FROM trains
ORDER BY id;
"#,
        )
        .fetch_all(conn)
        .await?;

        rows.iter().map(row_to_train).collect()
    }

    #[instrument(skip(self, conn), target = "ledger")]
    async fn audit(
        &self,
        conn: &mut SqliteConnection,
        train_id: TrainId,
    ) -> Result<(), LedgerError> {
        let (remaining, capacity) = Self::seat_counts(&mut *conn, train_id).await?;

        let confirmed: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE train_id = ? AND status = ?")
                .bind(train_id)
                .bind(ReservationStatus::Confirmed.to_string())
                .fetch_one(conn)
                .await?;

        if i64::from(remaining) + confirmed != i64::from(capacity) {
            error!(remaining, confirmed, capacity, "seat conservation violated");
            return Err(LedgerError::Inconsistent {
                train_id,
                detail: format!(
                    "{remaining} free + {confirmed} confirmed != capacity {capacity}"
                ),
            });
        }

        Ok(())
    }
}

/* =========================
Row mapping + conversions
========================= */

fn row_to_train(r: &SqliteRow) -> Result<Train, LedgerError> {
    let id: TrainId = r.try_get("id")?;

    Ok(Train {
        id,
        name: r.try_get("name")?,
        source: r.try_get("source")?,
        destination: r.try_get("destination")?,
        time: r.try_get("time")?,
        seats_remaining: i64_to_u32(id, r.try_get("seats_remaining")?)?,
        capacity: i64_to_u32(id, r.try_get("capacity")?)?,
    })
}

fn i64_to_u32(train_id: TrainId, v: i64) -> Result<u32, LedgerError> {
    u32::try_from(v).map_err(|_| LedgerError::Inconsistent {
        train_id,
        detail: format!("seat value out of range: {v}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_seat_values_are_inconsistent() {
        let err = i64_to_u32(4, -1).unwrap_err();
        assert!(matches!(err, LedgerError::Inconsistent { train_id: 4, .. }));
    }

    #[test]
    fn in_range_seat_values_convert() {
        assert_eq!(i64_to_u32(1, 0).unwrap(), 0);
        assert_eq!(i64_to_u32(1, 70).unwrap(), 70);
    }
}
