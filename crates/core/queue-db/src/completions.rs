//! Completion records: the append-only audit trail of finished jobs
//!
//! One record is written per finished job, in the same transaction as the
//! job's `FINISHED` transition. A record must never become visible without
//! its job already being finished; that ordering is enforced purely by the
//! shared transaction, so the insert here is never called outside one.

use sqlx::types::chrono::{DateTime, Utc};

pub(crate) mod sql;

use crate::{error::Error, jobs::JobId, worker_name::WorkerName};

/// A unique identifier for a completion record
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    sqlx::Type,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CompletionId(i64);

impl std::fmt::Display for CompletionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable audit entry closing out one finished job.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompletionRecord {
    /// Unique identifier for the record
    pub id: CompletionId,

    /// The job this record closes out
    pub job_id: JobId,

    /// Completion timestamp, set at record-creation time
    pub finished_at: DateTime<Utc>,

    /// Identifier of the worker process that performed the work
    pub worker_name: WorkerName,
}

/// Append a completion record for the given job
///
/// `finished_at` is set to the database's current time. Must be called with
/// the same transaction that writes the job's `FINISHED` transition.
#[tracing::instrument(skip(exe), err)]
pub async fn insert<'c, E>(
    exe: E,
    job_id: JobId,
    worker_name: &WorkerName,
) -> Result<CompletionId, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::insert(exe, job_id, worker_name)
        .await
        .map_err(Error::Database)
}

/// Get all completion records for a given job
///
/// Exactly one record per job is expected; more than one indicates a broken
/// claim transaction.
#[tracing::instrument(skip(exe), err)]
pub async fn list_by_job_id<'c, E>(exe: E, job_id: JobId) -> Result<Vec<CompletionRecord>, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::list_by_job_id(exe, job_id).await.map_err(Error::Database)
}

/// List all completion records, oldest first
#[tracing::instrument(skip(exe), err)]
pub async fn list_all<'c, E>(exe: E) -> Result<Vec<CompletionRecord>, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::list_all(exe).await.map_err(Error::Database)
}

/// Count all completion records
#[tracing::instrument(skip(exe), err)]
pub async fn count<'c, E>(exe: E) -> Result<i64, Error>
where
    E: sqlx::Executor<'c, Database = sqlx::Postgres>,
{
    sql::count(exe).await.map_err(Error::Database)
}

/// In-tree DB integration tests
#[cfg(test)]
mod tests {
    mod it_completions;
}
