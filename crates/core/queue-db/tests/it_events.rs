//! DB integration tests for the queue wake-up channel

use std::time::Duration;

use pgtemp::PgTempDB;
use queue_db::{jobs, QueueDb, DEFAULT_POOL_SIZE};

#[tokio::test]
async fn enqueue_notification_reaches_listener() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let mut listener = db
        .listen_for_job_notifications()
        .await
        .expect("Failed to connect the listener");

    //* When
    let job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");
    db.notify_job_enqueued(job_id)
        .await
        .expect("Failed to send wake-up notification");

    //* Then
    let notif = tokio::time::timeout(Duration::from_secs(5), listener.recv())
        .await
        .expect("Timed out waiting for notification")
        .expect("Failed to receive notification");
    assert_eq!(notif.job_id, job_id);
}

#[tokio::test]
async fn notifications_before_listen_are_not_delivered() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let early_job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");
    db.notify_job_enqueued(early_job_id)
        .await
        .expect("Failed to send wake-up notification");

    //* When
    // The listener connects after the first notification was sent
    let mut listener = db
        .listen_for_job_notifications()
        .await
        .expect("Failed to connect the listener");

    let late_job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");
    db.notify_job_enqueued(late_job_id)
        .await
        .expect("Failed to send wake-up notification");

    //* Then
    // Only the notification sent after LISTEN arrives
    let notif = tokio::time::timeout(Duration::from_secs(5), listener.recv())
        .await
        .expect("Timed out waiting for notification")
        .expect("Failed to receive notification");
    assert_eq!(notif.job_id, late_job_id);
}
