//! Transaction wrapper providing RAII semantics with automatic rollback

use sqlx::{PgConnection, Postgres};

use crate::error::Error;

/// Transaction wrapper providing RAII semantics
///
/// Wraps a [`sqlx::Transaction`] and rolls back automatically when dropped
/// unless `commit()` is called explicitly. Row locks taken inside the
/// transaction are held until commit or rollback.
///
/// Dereferences to [`PgConnection`], so the executor-generic query helpers
/// in this crate accept `&mut *tx`.
#[derive(Debug)]
pub struct Transaction(sqlx::Transaction<'static, Postgres>);

impl Transaction {
    pub(crate) fn new(tx: sqlx::Transaction<'static, Postgres>) -> Self {
        Self(tx)
    }

    /// Commits all changes made within this transaction.
    ///
    /// If not called, the transaction automatically rolls back when dropped.
    pub async fn commit(self) -> Result<(), Error> {
        self.0.commit().await.map_err(Error::Database)
    }

    /// Rolls back all changes made within this transaction.
    ///
    /// Equivalent to dropping the transaction but allows explicit error handling.
    pub async fn rollback(self) -> Result<(), Error> {
        self.0.rollback().await.map_err(Error::Database)
    }
}

impl std::ops::Deref for Transaction {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Transaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
