//! Internal SQL operations for completion records

use sqlx::{Executor, Postgres};

use super::{CompletionId, CompletionRecord};
use crate::{jobs::JobId, worker_name::WorkerName};

/// Insert a new completion record
///
/// `finished_at` is set to the database's current time at insert.
pub async fn insert<'c, E>(
    exe: E,
    job_id: JobId,
    worker_name: &WorkerName,
) -> Result<CompletionId, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        INSERT INTO completion_records (job_id, finished_at, worker_name)
        VALUES ($1, now(), $2)
        RETURNING id
    "#};
    sqlx::query_scalar(query)
        .bind(job_id)
        .bind(worker_name)
        .fetch_one(exe)
        .await
}

/// Get all completion records for a given job, oldest first
pub async fn list_by_job_id<'c, E>(
    exe: E,
    job_id: JobId,
) -> Result<Vec<CompletionRecord>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        SELECT id, job_id, finished_at, worker_name
        FROM completion_records
        WHERE job_id = $1
        ORDER BY id ASC
    "#};
    sqlx::query_as(query).bind(job_id).fetch_all(exe).await
}

/// List all completion records, oldest first
pub async fn list_all<'c, E>(exe: E) -> Result<Vec<CompletionRecord>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        SELECT id, job_id, finished_at, worker_name
        FROM completion_records
        ORDER BY id ASC
    "#};
    sqlx::query_as(query).fetch_all(exe).await
}

/// Count all completion records
pub async fn count<'c, E>(exe: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        SELECT COUNT(*)
        FROM completion_records
    "#};
    sqlx::query_scalar(query).fetch_one(exe).await
}
