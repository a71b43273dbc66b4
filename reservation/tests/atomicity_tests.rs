use std::sync::Arc;

use reservation::code::RandomCodeSource;
use reservation::db::Db;
use reservation::{NewTrain, ReservationAllocator, ReservationError, ReservationStatus, TrainId};

use failing_ledger::FailingLedger;

async fn setup() -> (Db, TrainId) {
    let db = Db::connect_in_memory().await.unwrap();
    let id = db
        .insert_train(&NewTrain::new(
            "Duronto Express",
            "Kolkata",
            "Bangalore",
            "07:30 PM",
            55,
        ))
        .await
        .unwrap();
    (db, id)
}

fn allocator_failing_on(db: &Db, delta: i64) -> ReservationAllocator {
    ReservationAllocator::new(
        db.pool.clone(),
        Arc::new(FailingLedger::failing_on(delta)),
        Arc::new(RandomCodeSource::seeded(3)),
        10,
    )
}

#[tokio::test]
async fn failed_decrement_leaves_no_booking_row() {
    let (db, id) = setup().await;
    let alloc = allocator_failing_on(&db, -1);

    let err = alloc.book("alice", id).await.unwrap_err();
    assert!(matches!(err, ReservationError::Inconsistent(_)));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(rows, 0, "booking row must be rolled back with the ledger");
    assert_eq!(alloc.available_seats(id).await.unwrap(), 55);
}

#[tokio::test]
async fn failed_increment_keeps_reservation_confirmed() {
    let (db, id) = setup().await;
    let healthy = ReservationAllocator::with_defaults(db.pool.clone());
    let code = healthy.book("alice", id).await.unwrap();

    let faulty = allocator_failing_on(&db, 1);
    let err = faulty.cancel("alice", code.as_str()).await.unwrap_err();
    assert!(matches!(err, ReservationError::Inconsistent(_)));

    let r = healthy.lookup("alice", code.as_str()).await.unwrap();
    assert_eq!(r.status, ReservationStatus::Confirmed);
    assert_eq!(healthy.available_seats(id).await.unwrap(), 54);

    // Once the fault is gone the same cancellation goes through.
    healthy.cancel("alice", code.as_str()).await.unwrap();
    assert_eq!(healthy.available_seats(id).await.unwrap(), 55);
    healthy.audit().await.unwrap();
}

#[tokio::test]
async fn failed_booking_does_not_poison_later_ones() {
    let (db, id) = setup().await;

    let faulty = allocator_failing_on(&db, -1);
    for _ in 0..3 {
        assert!(faulty.book("alice", id).await.is_err());
    }

    let healthy = ReservationAllocator::with_defaults(db.pool.clone());
    healthy.book("alice", id).await.unwrap();

    assert_eq!(healthy.available_seats(id).await.unwrap(), 54);
    healthy.audit().await.unwrap();
}
