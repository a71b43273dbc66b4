use sqlx::SqlitePool;

/// Idempotent schema bootstrap. Safe to run on every start.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    // Trains
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS trains (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  source TEXT NOT NULL,
  destination TEXT NOT NULL,
  time TEXT NOT NULL,
  seats_remaining INTEGER NOT NULL CHECK (seats_remaining >= 0),
  capacity INTEGER NOT NULL CHECK (capacity >= 0)
);
"#,
    )
    .execute(pool)
    .await?;

    // Bookings
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS bookings (
  code TEXT PRIMARY KEY,
  rider TEXT NOT NULL,
  train_id INTEGER NOT NULL REFERENCES trains(id),
  created_at TEXT NOT NULL,
  status TEXT NOT NULL CHECK (status IN ('Confirmed', 'Cancelled'))
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(r#"CREATE INDEX IF NOT EXISTS idx_bookings_train ON bookings(train_id);"#)
        .execute(pool)
        .await?;

    Ok(())
}
