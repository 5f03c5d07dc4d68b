//! Integration tests for transaction support
//!
//! The claim protocol rests on two properties checked here: the status
//! transition and the completion record commit or roll back together, and a
//! dropped transaction behaves like an explicit rollback.

use pgtemp::PgTempDB;

use crate::{
    completions, jobs,
    jobs::JobStatus,
    QueueDb, WorkerName, DEFAULT_POOL_SIZE,
};

#[tokio::test]
async fn commit_persists_transition_and_record_together() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let worker_name: WorkerName = "test-worker".parse().expect("Invalid worker name");
    let job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");

    let mut tx = db.begin_txn().await.expect("Failed to begin transaction");
    jobs::update_status_if_current(&mut *tx, job_id, &[JobStatus::Pending], JobStatus::Finished)
        .await
        .expect("Failed to finish job in transaction");
    completions::insert(&mut *tx, job_id, &worker_name)
        .await
        .expect("Failed to insert completion record in transaction");

    //* When
    tx.commit().await.expect("Failed to commit");

    //* Then
    let job = jobs::get_by_id(&*db.pool, job_id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");
    assert_eq!(job.status, JobStatus::Finished);

    let records = completions::list_by_job_id(&*db.pool, job_id)
        .await
        .expect("Failed to list completion records");
    assert_eq!(records.len(), 1, "exactly one record per finished job");
}

#[tokio::test]
async fn explicit_rollback_discards_transition_and_record_together() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let worker_name: WorkerName = "test-worker".parse().expect("Invalid worker name");
    let job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");

    let mut tx = db.begin_txn().await.expect("Failed to begin transaction");
    jobs::update_status_if_current(&mut *tx, job_id, &[JobStatus::Pending], JobStatus::Finished)
        .await
        .expect("Failed to finish job in transaction");
    completions::insert(&mut *tx, job_id, &worker_name)
        .await
        .expect("Failed to insert completion record in transaction");

    //* When
    tx.rollback().await.expect("Failed to roll back");

    //* Then
    // The row reverts to PENDING and no orphaned record exists
    let job = jobs::get_by_id(&*db.pool, job_id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");
    assert_eq!(job.status, JobStatus::Pending);

    let records = completions::list_by_job_id(&*db.pool, job_id)
        .await
        .expect("Failed to list completion records");
    assert!(records.is_empty(), "no completion without a finished job");
}

#[tokio::test]
async fn rollback_on_drop_discards_changes() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");

    let mut tx = db.begin_txn().await.expect("Failed to begin transaction");
    jobs::update_status_if_current(&mut *tx, job_id, &[JobStatus::Pending], JobStatus::Finished)
        .await
        .expect("Failed to finish job in transaction");

    //* When
    drop(tx);

    //* Then
    let job = jobs::get_by_id(&*db.pool, job_id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");
    assert_eq!(
        job.status,
        JobStatus::Pending,
        "dropped transaction must leave the job untouched"
    );
}
