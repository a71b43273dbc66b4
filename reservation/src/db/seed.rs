use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::model::{NewTrain, TrainId};

/// Default timetable loaded into an empty database.
pub fn sample_trains() -> Vec<NewTrain> {
    vec![
        NewTrain::new("Shatabdi Express", "Kolkata", "Delhi", "06:00 AM", 50),
        NewTrain::new("Rajdhani Express", "Mumbai", "Delhi", "09:00 AM", 60),
        NewTrain::new("Duronto Express", "Kolkata", "Bangalore", "07:30 PM", 55),
        NewTrain::new("Intercity Express", "Chennai", "Hyderabad", "03:00 PM", 40),
        NewTrain::new("Garib Rath", "Patna", "Delhi", "11:45 PM", 70),
    ]
}

pub async fn insert_train(pool: &SqlitePool, train: &NewTrain) -> anyhow::Result<TrainId> {
    let mut conn = pool.acquire().await?;
    insert_train_on(&mut *conn, train).await
}

/// A new train starts with every seat free.
async fn insert_train_on(conn: &mut SqliteConnection, train: &NewTrain) -> anyhow::Result<TrainId> {
    let res = sqlx::query(
        r#"
INSERT INTO trains (name, source, destination, time, seats_remaining, capacity)
VALUES (?, ?, ?, ?, ?, ?);
"#,
    )
    .bind(&train.name)
    .bind(&train.source)
    .bind(&train.destination)
    .bind(&train.time)
    .bind(i64::from(train.capacity))
    .bind(i64::from(train.capacity))
    .execute(conn)
    .await?;

    Ok(res.last_insert_rowid())
}

pub async fn seed_sample_trains(pool: &SqlitePool) -> anyhow::Result<usize> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trains")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        info!(existing, "trains already present; skipping seed");
        return Ok(0);
    }

    let trains = sample_trains();
    let mut tx = pool.begin().await?;
    for t in &trains {
        insert_train_on(&mut *tx, t).await?;
    }
    tx.commit().await?;

    info!(count = trains.len(), "seeded sample trains");
    Ok(trains.len())
}
