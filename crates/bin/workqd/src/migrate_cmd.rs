use queue_db::QueueDb;

pub async fn run(database_url: &str, pool_size: u32) -> Result<(), Error> {
    // `connect` applies pending migrations before returning.
    QueueDb::connect(database_url, pool_size)
        .await
        .map_err(Error::Migrate)?;

    tracing::info!("queue database schema is up to date");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connecting or migrating failed.
    #[error("Failed to migrate the queue database: {0}")]
    Migrate(#[source] queue_db::Error),
}
