//! Error types for queue database operations

use crate::db::ConnError;

/// Errors that can occur when interacting with the queue database
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error connecting to queue db: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Error running migrations: {0}")]
    MigrationError(#[source] sqlx::migrate::MigrateError),

    #[error("Error executing database query: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Error sending job notification: {0}")]
    NotificationSend(#[from] crate::events::NotifSendError),

    #[error("Error receiving job notification: {0}")]
    NotificationRecv(#[from] crate::events::NotifRecvError),

    #[error("Job status update error: {0}")]
    JobStatusUpdate(#[from] crate::jobs::JobStatusUpdateError),
}

impl Error {
    /// Returns `true` if the error is likely to be a transient connection issue.
    ///
    /// This is used to determine if an operation should be retried.
    ///
    /// The following errors are considered transient:
    /// - `Error::ConnectionError`: failure to establish the initial connection.
    /// - `sqlx::Error::Io`: an I/O error, often a network issue or closed socket.
    /// - `sqlx::Error::Tls`: an error during the TLS handshake.
    /// - `sqlx::Error::PoolTimedOut`: the pool timed out waiting for a free connection.
    /// - `sqlx::Error::PoolClosed`: the pool was closed while an operation was pending.
    ///
    /// Other database errors, such as constraint violations, are not
    /// considered transient and will not be retried.
    pub fn is_connection_error(&self) -> bool {
        match self {
            Error::ConnectionError(_) => true,
            Error::Database(err) => matches!(
                err,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
            ),
            _ => false,
        }
    }

    /// Returns `true` if the error is retryable.
    ///
    /// This includes connection errors plus the transaction-level failures
    /// commonly seen with concurrent row locking:
    /// - serialization failures (PostgreSQL error code `40001`)
    /// - deadlocks (PostgreSQL error code `40P01`)
    ///
    /// Both are transient and safe to retry from the beginning of the
    /// transaction.
    pub fn is_retryable(&self) -> bool {
        if self.is_connection_error() {
            return true;
        }

        matches!(
            self,
            Error::Database(sqlx::Error::Database(err))
                if err.code().is_some_and(|code| matches!(
                    code.as_ref(),
                    "40001" | // serialization_failure
                    "40P01"   // deadlock_detected
                ))
        )
    }
}

impl From<ConnError> for Error {
    fn from(err: ConnError) -> Self {
        match err {
            ConnError::ConnectionError(err) => Error::ConnectionError(err),
            ConnError::MigrationFailed(err) => Error::MigrationError(err),
        }
    }
}
