//! Internal database connection abstractions
//!
//! This module provides the core database primitives: the connection pool and
//! the transaction wrapper. Only selected types are re-exported publicly
//! through lib.rs.

mod conn;
mod txn;

pub use conn::{ConnError, ConnPool};
pub use txn::Transaction;
