//! Shared queue database for distributed job claiming.
//!
//! This crate is the single source of truth for a pool of independent worker
//! processes: a `jobs` table of claimable items and an append-only
//! `completion_records` audit table, both living in one PostgreSQL instance
//! reachable by every worker.
//!
//! Mutual exclusion between claimants is delegated entirely to the store:
//! [`jobs::lock_next_pending`] takes a transaction-scoped row lock with
//! `SKIP LOCKED` semantics, so two workers can never hold the same row and a
//! claimant never blocks waiting on a lock. There is no application-level
//! locking anywhere above this crate.

use std::{sync::Arc, time::Duration};

use tracing::instrument;

pub mod completions;
mod db;
mod error;
pub mod events;
pub mod jobs;
mod worker_name;

pub use self::{
    completions::{CompletionId, CompletionRecord},
    db::{ConnError, ConnPool, Transaction},
    error::Error,
    events::{JobNotification, NotifListener, NotifRecvError, NotifSendError},
    jobs::{Job, JobId, JobStatus, JobStatusUpdateError},
    worker_name::{InvalidWorkerNameError, WorkerName, UNKNOWN_WORKER_NAME},
};

/// Default pool size for the queue DB.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Connection pool to the queue DB. Clones will refer to the same instance.
#[derive(Clone, Debug)]
pub struct QueueDb {
    pub pool: ConnPool,
    url: Arc<str>,
}

impl QueueDb {
    /// Sets up a connection pool to the queue DB
    ///
    /// Runs migrations if necessary.
    #[instrument(skip_all, err)]
    pub async fn connect(url: &str, pool_size: u32) -> Result<Self, Error> {
        Self::connect_with_config(url, pool_size, true).await
    }

    /// Sets up a connection pool to the queue DB with configurable migration behavior
    ///
    /// Runs migrations only if `auto_migrate` is true.
    #[instrument(skip_all, err)]
    pub async fn connect_with_config(
        url: &str,
        pool_size: u32,
        auto_migrate: bool,
    ) -> Result<Self, Error> {
        let pool = ConnPool::connect(url, pool_size).await?;
        if auto_migrate {
            pool.run_migrations().await?;
        }
        Ok(Self {
            pool,
            url: url.into(),
        })
    }

    /// Sets up a connection pool with retry logic for databases that are still starting up.
    ///
    /// Retries Postgres error code `57P03` ("the database system is starting
    /// up") with exponential backoff. Useful against freshly provisioned or
    /// ephemeral database instances.
    #[instrument(skip_all, err)]
    pub async fn connect_with_retry(url: &str, pool_size: u32) -> Result<Self, Error> {
        use backon::{ExponentialBuilder, Retryable};

        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(10))
            .with_max_delay(Duration::from_millis(100))
            .with_max_times(20);

        fn is_db_starting_up(err: &ConnError) -> bool {
            matches!(
                err,
                ConnError::ConnectionError(sqlx::Error::Database(db_err))
                if db_err.code().is_some_and(|code| code == "57P03")
            )
        }

        fn notify_retry(err: &ConnError, dur: Duration) {
            tracing::warn!(
                error = %err,
                "Database still starting up during connection. Retrying in {:.1}s",
                dur.as_secs_f32()
            );
        }

        let pool = (|| ConnPool::connect(url, pool_size))
            .retry(retry_policy)
            .when(is_db_starting_up)
            .notify(notify_retry)
            .await?;

        pool.run_migrations().await?;

        Ok(Self {
            pool,
            url: url.into(),
        })
    }

    /// Begins a new database transaction
    ///
    /// Returns a [`Transaction`] that provides RAII semantics: it rolls back
    /// automatically when dropped unless explicitly committed. Row locks
    /// taken inside it are released at commit or rollback, at which point a
    /// rolled-back `PENDING` row becomes visible to the next claimant.
    #[instrument(skip(self), err)]
    pub async fn begin_txn(&self) -> Result<Transaction, Error> {
        let tx = self.pool.begin().await.map_err(Error::Database)?;
        Ok(Transaction::new(tx))
    }

    /// Listen on the queue wake-up notification channel
    ///
    /// Establishes a dedicated connection for the listener; see
    /// [`events`] for the delivery guarantees.
    pub async fn listen_for_job_notifications(&self) -> Result<NotifListener, Error> {
        events::listen_url(&self.url)
            .await
            .map_err(Error::ConnectionError)
    }

    /// Send a queue wake-up notification for a freshly enqueued job
    #[instrument(skip(self), err)]
    pub async fn notify_job_enqueued(&self, job_id: JobId) -> Result<(), Error> {
        events::notify(&*self.pool, JobNotification::enqueued(job_id)).await?;
        Ok(())
    }
}

/// In-tree integration tests
#[cfg(test)]
mod tests {
    mod it_txn;
}
