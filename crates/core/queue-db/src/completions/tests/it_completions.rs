//! In-tree DB integration tests for completion records

use pgtemp::PgTempDB;

use crate::{
    completions, jobs,
    jobs::JobStatus,
    QueueDb, WorkerName, DEFAULT_POOL_SIZE,
};

#[tokio::test]
async fn insert_appends_one_record_per_job() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let worker_name: WorkerName = "test-worker".parse().expect("Invalid worker name");
    let job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");

    //* When
    let record_id = completions::insert(&*db.pool, job_id, &worker_name)
        .await
        .expect("Failed to insert completion record");

    //* Then
    let records = completions::list_by_job_id(&*db.pool, job_id)
        .await
        .expect("Failed to list completion records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, record_id);
    assert_eq!(records[0].job_id, job_id);
    assert_eq!(records[0].worker_name, worker_name);
}

#[tokio::test]
async fn records_attribute_work_to_their_worker() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let worker_a: WorkerName = "worker-a".parse().expect("Invalid worker name");
    let worker_b: WorkerName = "worker-b".parse().expect("Invalid worker name");

    let job_id1 = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job 1");
    let job_id2 = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job 2");

    //* When
    completions::insert(&*db.pool, job_id1, &worker_a)
        .await
        .expect("Failed to insert record for worker a");
    completions::insert(&*db.pool, job_id2, &worker_b)
        .await
        .expect("Failed to insert record for worker b");

    //* Then
    let all = completions::list_all(&*db.pool)
        .await
        .expect("Failed to list completion records");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].job_id, job_id1);
    assert_eq!(all[0].worker_name, worker_a);
    assert_eq!(all[1].job_id, job_id2);
    assert_eq!(all[1].worker_name, worker_b);

    let count = completions::count(&*db.pool)
        .await
        .expect("Failed to count completion records");
    assert_eq!(count, 2);
}

#[tokio::test]
async fn finished_at_is_set_at_record_creation() {
    //* Given
    let temp_db = PgTempDB::new();
    let db = QueueDb::connect_with_retry(&temp_db.connection_uri(), DEFAULT_POOL_SIZE)
        .await
        .expect("Failed to connect to queue db");

    let worker_name: WorkerName = "test-worker".parse().expect("Invalid worker name");
    let job_id = jobs::insert_pending(&*db.pool)
        .await
        .expect("Failed to insert job");
    jobs::update_status_if_current(
        &*db.pool,
        job_id,
        &[JobStatus::Pending],
        JobStatus::Finished,
    )
    .await
    .expect("Failed to finish job");

    //* When
    completions::insert(&*db.pool, job_id, &worker_name)
        .await
        .expect("Failed to insert completion record");

    //* Then
    let job = jobs::get_by_id(&*db.pool, job_id)
        .await
        .expect("Failed to get job")
        .expect("Job not found");
    let records = completions::list_by_job_id(&*db.pool, job_id)
        .await
        .expect("Failed to list completion records");
    assert!(
        records[0].finished_at >= job.created_at,
        "completion must not predate the job"
    );
}
