use std::time::Duration;

use queue_db::{QueueDb, WorkerName};
use tokio_util::sync::CancellationToken;
use worker::{Config, Worker};

use crate::shutdown::shutdown_signal;

pub async fn run(
    database_url: &str,
    pool_size: u32,
    worker_name: WorkerName,
    work_duration: Duration,
    no_wakeups: bool,
) -> Result<(), Error> {
    // Failing to reach the store at startup is the one fatal error; once the
    // loop is running, store failures are retried indefinitely.
    let db = QueueDb::connect(database_url, pool_size)
        .await
        .map_err(Error::Connect)?;

    let mut config = Config::new(worker_name);
    if no_wakeups {
        config = config.without_wakeups();
    }

    // Simulated work body. Real deployments replace this with their own
    // workload; its only observable signals are duration and outcome.
    let work = move |job: queue_db::Job| async move {
        tracing::info!(job_id = %job.id, "working");
        tokio::time::sleep(work_duration).await;
        Ok(())
    };

    let cancel = CancellationToken::new();
    let worker = Worker::new(db, config, work, cancel.clone());
    let handle = tokio::spawn(worker.run());

    shutdown_signal().await;
    cancel.cancel();

    // The in-flight claim settles (commit or rollback) before run() returns.
    handle.await.map_err(|err| Error::WorkerPanicked(err.into()))?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to establish the initial store connection.
    #[error("Failed to connect to the queue database: {0}")]
    Connect(#[source] queue_db::Error),

    /// The worker task terminated abnormally.
    #[error("Worker task panicked: {0}")]
    WorkerPanicked(#[source] Box<dyn std::error::Error + Send + Sync>),
}
