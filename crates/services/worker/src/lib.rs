//! Claiming worker for the shared job queue.
//!
//! This crate provides the per-process control loop that competes for
//! pending jobs in the shared queue database. Each claim runs in one
//! database transaction: the next unlocked `PENDING` row is locked and
//! transitioned to `FINISHED`, the caller-supplied work body runs, and a
//! completion record is appended, all committing together. Any failure rolls
//! the whole claim back, returning the row to the queue for any worker to
//! retry.
//!
//! Shutdown is cooperative: a cancellation token is checked between claim
//! attempts only, so an in-flight claim always settles (commit or rollback)
//! before the loop exits.

pub mod backoff;
pub mod claim;
pub mod config;
mod worker;

pub use self::{
    claim::{claim_next, BoxError, ClaimError},
    config::Config,
    worker::Worker,
};
