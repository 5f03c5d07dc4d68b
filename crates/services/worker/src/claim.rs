//! The claim protocol: one transaction per claimed job
//!
//! Converts "a worker wants work" into "exactly one worker safely owns one
//! job". The row lock taken by `lock_next_pending` is held until the final
//! commit or rollback, so no second worker can observe or claim the row
//! while this one holds it; concurrent claimants are routed to other rows or
//! to no work at all.

use std::future::Future;

use queue_db::{completions, jobs, Job, JobId, JobStatus, JobStatusUpdateError, QueueDb, WorkerName};

/// Boxed error type for the opaque work body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error that aborted one claim attempt
///
/// Every variant rolls the claim transaction back: the job row reverts to
/// `PENDING` and becomes claimable again by any worker, including this one.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    /// A queue store operation failed
    #[error("queue store error: {0}")]
    Store(#[source] queue_db::Error),

    /// The locked row could not be transitioned
    ///
    /// `NotFound` means the row vanished between lock and update; treated as
    /// a lost race.
    #[error("job status update failed: {0}")]
    Status(#[source] JobStatusUpdateError),

    /// The opaque work body failed
    #[error("work body failed: {0}")]
    WorkBody(#[source] BoxError),
}

impl ClaimError {
    /// Returns `true` if the failure is transient: store connectivity
    /// issues, lock conflicts, and lost races. Transient failures are
    /// expected under contention and safe to retry on the next iteration.
    pub fn is_transient(&self) -> bool {
        match self {
            ClaimError::Store(err) => err.is_retryable(),
            // The row vanished or changed under us: a lost race, retried by
            // whichever worker next claims it.
            ClaimError::Status(JobStatusUpdateError::NotFound) => true,
            ClaimError::Status(JobStatusUpdateError::StateConflict { .. }) => true,
            ClaimError::Status(JobStatusUpdateError::Database(_)) => false,
            ClaimError::WorkBody(_) => false,
        }
    }
}

/// Attempt to claim and complete one job
///
/// Runs the full claim protocol in a single transaction:
///
///  1. Begin a transaction.
///  2. Lock the next unlocked `PENDING` row; if none exists, roll back and
///     return `Ok(None)`, an expected outcome rather than an error.
///  3. Transition the row to `FINISHED`.
///  4. Run the caller's work body.
///  5. Append a completion record attributed to `worker_name`.
///  6. Commit.
///
/// If the work body or any store call fails, the transaction rolls back and
/// the job becomes claimable again. Whichever worker next wins the race
/// retries it; that is not guaranteed to be this one.
#[tracing::instrument(skip(db, work), err)]
pub async fn claim_next<F, Fut>(
    db: &QueueDb,
    worker_name: &WorkerName,
    work: F,
) -> Result<Option<JobId>, ClaimError>
where
    F: FnOnce(Job) -> Fut,
    Fut: Future<Output = Result<(), BoxError>>,
{
    let mut tx = db.begin_txn().await.map_err(ClaimError::Store)?;

    let Some(job) = jobs::lock_next_pending(&mut *tx)
        .await
        .map_err(ClaimError::Store)?
    else {
        tx.rollback().await.map_err(ClaimError::Store)?;
        return Ok(None);
    };

    let job_id = job.id;
    tracing::debug!(worker_name = %worker_name, %job_id, "job claimed");

    jobs::update_status_if_current(&mut *tx, job_id, &[JobStatus::Pending], JobStatus::Finished)
        .await
        .map_err(ClaimError::Status)?;

    // The work body is opaque and may be slow; the row stays locked for its
    // whole duration. On failure the transaction is dropped, which rolls
    // everything back.
    work(job).await.map_err(ClaimError::WorkBody)?;

    completions::insert(&mut *tx, job_id, worker_name)
        .await
        .map_err(ClaimError::Store)?;

    tx.commit().await.map_err(ClaimError::Store)?;

    Ok(Some(job_id))
}
