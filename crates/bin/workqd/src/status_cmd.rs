use queue_db::{completions, jobs, JobStatus, QueueDb};

pub async fn run(database_url: &str, pool_size: u32) -> Result<(), Error> {
    let db = QueueDb::connect(database_url, pool_size)
        .await
        .map_err(Error::Connect)?;

    let pending = jobs::count_by_status(&*db.pool, JobStatus::Pending)
        .await
        .map_err(Error::Query)?;
    let finished = jobs::count_by_status(&*db.pool, JobStatus::Finished)
        .await
        .map_err(Error::Query)?;
    let completions = completions::count(&*db.pool)
        .await
        .map_err(Error::Query)?;

    println!("pending jobs:       {pending}");
    println!("finished jobs:      {finished}");
    println!("completion records: {completions}");

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to establish the store connection.
    #[error("Failed to connect to the queue database: {0}")]
    Connect(#[source] queue_db::Error),

    /// A counter query failed.
    #[error("Failed to query queue status: {0}")]
    Query(#[source] queue_db::Error),
}
