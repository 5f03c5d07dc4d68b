//! Job management module for the queue database
//!
//! This module provides the claimable-work side of the queue: inserting
//! `PENDING` rows, locking the next claimable row, and the conditional
//! status transition to `FINISHED`.

use sqlx::types::chrono::{DateTime, Utc};

mod job_id;
mod job_status;
pub(crate) mod sql;

pub use self::{job_id::JobId, job_status::JobStatus};
use crate::error::Error;

/// Insert a new job in the `PENDING` state
///
/// This is a producer-side operation; this crate's worker-facing API never
/// creates jobs.
#[tracing::instrument(skip(exe), err)]
pub async fn insert_pending<'c, E>(exe: E) -> Result<JobId, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::insert_pending(exe).await.map_err(Error::Database)
}

/// Select and lock the next `PENDING` job
///
/// The returned row is exclusively locked for the lifetime of the
/// surrounding transaction. Rows locked by concurrent transactions are
/// skipped, never waited on. Returns `None` when no claimable work exists,
/// which is an expected outcome under low load.
#[tracing::instrument(skip(exe), err)]
pub async fn lock_next_pending<'c, E>(exe: E) -> Result<Option<Job>, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::lock_next_pending(exe).await.map_err(Error::Database)
}

/// Conditionally transition a job's status
///
/// The transition only happens if the job currently has one of
/// `expected_statuses`; status writes are monotonic and never regress.
#[tracing::instrument(skip(exe), err)]
pub async fn update_status_if_current<'c, E>(
    exe: E,
    id: JobId,
    expected_statuses: &[JobStatus],
    new_status: JobStatus,
) -> Result<(), JobStatusUpdateError>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::update_status_if_current(exe, id, expected_statuses, new_status).await
}

/// Returns the job with the given ID
#[tracing::instrument(skip(exe), err)]
pub async fn get_by_id<'c, E>(exe: E, id: impl Into<JobId> + std::fmt::Debug) -> Result<Option<Job>, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::get_by_id(exe, id.into()).await.map_err(Error::Database)
}

/// Count jobs with the given status
#[tracing::instrument(skip(exe), err)]
pub async fn count_by_status<'c, E>(exe: E, status: JobStatus) -> Result<i64, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::count_by_status(exe, status).await.map_err(Error::Database)
}

/// Error type for conditional job status updates
#[derive(Debug, thiserror::Error)]
pub enum JobStatusUpdateError {
    /// The targeted row no longer exists. Treated by callers as a lost race.
    #[error("Job not found")]
    NotFound,

    #[error("Job state conflict: expected one of {expected:?}, but found {actual}")]
    StateConflict {
        expected: Vec<JobStatus>,
        actual: JobStatus,
    },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

/// Represents one unit of claimable work.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Job {
    /// Unique identifier for the job, immutable once created
    pub id: JobId,

    /// Current status of the job
    pub status: JobStatus,

    /// Job creation timestamp
    pub created_at: DateTime<Utc>,

    /// Job last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// In-tree DB integration tests
#[cfg(test)]
mod tests {
    mod it_jobs;
}
