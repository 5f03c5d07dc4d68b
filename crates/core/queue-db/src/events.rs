//! Queue wake-up notification channel
//!
//! Producers can send a notification through Postgres's `LISTEN`/`NOTIFY`
//! mechanism when new jobs are enqueued. Idle workers listen on the channel
//! to cut claim latency without hot-polling the `jobs` table.
//!
//! # Delivery Guarantees
//!
//! - Notifications sent before the `LISTEN` command is issued will not be delivered.
//! - Notifications may be lost during automatic retry of a closed DB connection.
//!
//! The channel is therefore a latency optimization only: workers must still
//! poll, and the queue table remains the source of truth.

use sqlx::{postgres::PgListener, Postgres};

use crate::jobs::JobId;

/// The queue wake-up PostgreSQL notification channel name
const JOB_QUEUE_CHANNEL: &str = "workq_jobs";

/// Sends a wake-up notification for the given job to the queue channel.
#[tracing::instrument(skip_all, err)]
pub async fn notify<'c, E>(exe: E, payload: JobNotification) -> Result<(), NotifSendError>
where
    E: sqlx::Executor<'c, Database = Postgres>,
{
    let payload_str =
        serde_json::to_string(&payload).map_err(NotifSendError::SerializationFailed)?;

    sqlx::query("SELECT pg_notify($1, $2)")
        .bind(JOB_QUEUE_CHANNEL)
        .bind(&payload_str)
        .execute(exe)
        .await
        .map_err(NotifSendError::Database)?;
    Ok(())
}

/// An error that can occur when sending a queue notification
#[derive(Debug, thiserror::Error)]
pub enum NotifSendError {
    /// The notification payload serialization failed
    #[error("payload serialization failed: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// An error occurred while sending the notification
    #[error(transparent)]
    Database(sqlx::Error),
}

/// Establishes a new [`NotifListener`] by connecting to the specified URL.
#[tracing::instrument(skip_all, err)]
pub async fn listen_url(url: &str) -> Result<NotifListener, sqlx::Error> {
    NotifListener::connect(url).await
}

/// A listener for notifications on the queue wake-up channel.
///
/// Holds a dedicated database connection for the lifetime of the listener;
/// it is not taken from a pool.
pub struct NotifListener(PgListener);

impl NotifListener {
    /// Connects to the queue channel using `LISTEN`
    async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let mut listener = PgListener::connect(url).await?;
        listener.listen(JOB_QUEUE_CHANNEL).await?;
        Ok(Self(listener))
    }

    /// Receives the next notification from the channel.
    pub async fn recv(&mut self) -> Result<JobNotification, NotifRecvError> {
        let notif = self.0.recv().await.map_err(NotifRecvError::Database)?;
        serde_json::from_str(notif.payload()).map_err(NotifRecvError::DeserializationFailed)
    }
}

/// An error that can occur when receiving a queue notification
#[derive(Debug, thiserror::Error)]
pub enum NotifRecvError {
    /// An error occurred while receiving the notification
    #[error(transparent)]
    Database(sqlx::Error),

    /// The notification payload deserialization failed
    #[error("payload deserialization failed: {0}")]
    DeserializationFailed(#[source] serde_json::Error),
}

/// The payload of a queue wake-up notification
#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct JobNotification {
    pub job_id: JobId,
}

impl JobNotification {
    /// Create a wake-up notification for a freshly enqueued job
    pub fn enqueued(job_id: JobId) -> Self {
        Self { job_id }
    }
}

impl std::fmt::Debug for JobNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JobNotification(job_id={})", self.job_id)
    }
}
