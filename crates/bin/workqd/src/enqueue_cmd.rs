use queue_db::{jobs, QueueDb};

pub async fn run(database_url: &str, pool_size: u32, count: u32) -> Result<(), Error> {
    let db = QueueDb::connect(database_url, pool_size)
        .await
        .map_err(Error::Connect)?;

    for _ in 0..count {
        let job_id = jobs::insert_pending(&*db.pool)
            .await
            .map_err(Error::Insert)?;
        tracing::info!(%job_id, "job enqueued");

        // Wake-ups are best-effort; the job is durably queued either way.
        if let Err(err) = db.notify_job_enqueued(job_id).await {
            tracing::warn!(%job_id, error = %err, "failed to notify workers");
        }
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to establish the store connection.
    #[error("Failed to connect to the queue database: {0}")]
    Connect(#[source] queue_db::Error),

    /// Failed to insert a job.
    #[error("Failed to enqueue job: {0}")]
    Insert(#[source] queue_db::Error),
}
