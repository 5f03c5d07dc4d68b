//! Internal SQL operations for job management

use sqlx::{Executor, Postgres};

use super::{Job, JobId, JobStatus, JobStatusUpdateError};

/// Insert a new job into the queue in the `PENDING` state
///
/// This is the producer side of the queue; workers never insert jobs.
pub async fn insert_pending<'c, E>(exe: E) -> Result<JobId, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        INSERT INTO jobs (status, created_at, updated_at)
        VALUES ($1, now(), now())
        RETURNING id
    "#};
    let res = sqlx::query_scalar(query)
        .bind(JobStatus::Pending)
        .fetch_one(exe)
        .await?;
    Ok(res)
}

/// Select and lock the next claimable job
///
/// Takes an exclusive row lock on one `PENDING` row. The lock is held for
/// the lifetime of the surrounding transaction, so this must be called with
/// a transaction executor. `SKIP LOCKED` makes rows locked by concurrent
/// transactions invisible to this query instead of blocking on them: a
/// racing claimant is routed to a different row, or to `None`.
///
/// Returns `None` when no unlocked `PENDING` row exists. That is a normal
/// outcome, not an error.
pub async fn lock_next_pending<'c, E>(exe: E) -> Result<Option<Job>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        SELECT id, status, created_at, updated_at
        FROM jobs
        WHERE status = $1
        ORDER BY id ASC
        FOR UPDATE SKIP LOCKED
        LIMIT 1
    "#};
    let res = sqlx::query_as(query)
        .bind(JobStatus::Pending)
        .fetch_optional(exe)
        .await?;
    Ok(res)
}

/// Update the status of a job if it currently has one of the expected statuses
///
/// Returns `JobStatusUpdateError::NotFound` if the job does not exist, and
/// `JobStatusUpdateError::StateConflict` if it exists with a status other
/// than any of the expected ones.
pub async fn update_status_if_current<'c, E>(
    exe: E,
    id: JobId,
    expected_statuses: &[JobStatus],
    new_status: JobStatus,
) -> Result<(), JobStatusUpdateError>
where
    E: Executor<'c, Database = Postgres>,
{
    /// Internal structure to hold the result of the update operation
    #[derive(Debug, sqlx::FromRow)]
    struct UpdateResult {
        updated_id: Option<JobId>,
        original_status: Option<JobStatus>,
    }

    let query = indoc::indoc! {r#"
        WITH target_job AS (
            SELECT id, status
            FROM jobs
            WHERE id = $1
        ),
        target_job_update AS (
            UPDATE jobs
            SET status = $3, updated_at = now()
            WHERE id = $1 AND status = ANY($2)
            RETURNING id
        )
        SELECT
            target_job_update.id AS updated_id,
            target_job.status AS original_status
        FROM target_job
        LEFT JOIN target_job_update ON target_job.id = target_job_update.id
    "#};

    let result: Option<UpdateResult> = sqlx::query_as(query)
        .bind(id)
        .bind(expected_statuses)
        .bind(new_status)
        .fetch_optional(exe)
        .await
        .map_err(JobStatusUpdateError::Database)?;

    match result {
        Some(UpdateResult {
            updated_id: Some(_),
            ..
        }) => Ok(()),
        Some(UpdateResult {
            updated_id: None,
            original_status: Some(status),
        }) => Err(JobStatusUpdateError::StateConflict {
            expected: expected_statuses.to_vec(),
            actual: status,
        }),
        _ => Err(JobStatusUpdateError::NotFound),
    }
}

/// Get a job by its ID
pub async fn get_by_id<'c, E>(exe: E, id: JobId) -> Result<Option<Job>, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        SELECT id, status, created_at, updated_at
        FROM jobs
        WHERE id = $1
    "#};
    let res = sqlx::query_as(query).bind(id).fetch_optional(exe).await?;
    Ok(res)
}

/// Count jobs with the given status
pub async fn count_by_status<'c, E>(exe: E, status: JobStatus) -> Result<i64, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    let query = indoc::indoc! {r#"
        SELECT COUNT(*)
        FROM jobs
        WHERE status = $1
    "#};
    sqlx::query_scalar(query).bind(status).fetch_one(exe).await
}
