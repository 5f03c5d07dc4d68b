//! The worker control loop

use std::{future::Future, time::Duration};

use queue_db::{Job, NotifListener, QueueDb};
use tokio_util::sync::CancellationToken;

use crate::{
    backoff::IdleBackoff,
    claim::{self, BoxError},
    config::Config,
};

/// A claiming worker: repeatedly attempts claims until cancelled.
///
/// The loop has two states. While running it executes the claim protocol
/// over and over; once the cancellation token is observed it stops and never
/// claims again. The token is checked between claim attempts only: a claim
/// already in flight runs to its commit or rollback, it is never aborted
/// mid-transaction.
pub struct Worker<F> {
    db: QueueDb,
    config: Config,
    work: F,
    cancel: CancellationToken,
    idle: IdleBackoff,
    wakeups: Option<NotifListener>,
}

impl<F, Fut> Worker<F>
where
    F: Fn(Job) -> Fut,
    Fut: Future<Output = Result<(), BoxError>>,
{
    /// Creates a worker that runs `work` once per successfully claimed job.
    pub fn new(db: QueueDb, config: Config, work: F, cancel: CancellationToken) -> Self {
        let idle = IdleBackoff::new(config.min_idle_delay, config.max_idle_delay);
        Self {
            db,
            config,
            work,
            cancel,
            idle,
            wakeups: None,
        }
    }

    /// Runs the claim loop until the cancellation token is set.
    ///
    /// No error is fatal here: store failures and lost races are logged and
    /// retried indefinitely. Only the surrounding process decides to stop
    /// the loop, via the token.
    pub async fn run(mut self) {
        let worker_name = self.config.worker_name.clone();
        tracing::info!(worker_name = %worker_name, "worker started");

        if self.config.listen_for_wakeups {
            // Wake-ups are an optimization; run without them if the LISTEN
            // connection cannot be established.
            match self.db.listen_for_job_notifications().await {
                Ok(listener) => self.wakeups = Some(listener),
                Err(err) => {
                    tracing::warn!(worker_name = %worker_name, error = %err, "wake-up listener unavailable, relying on polling");
                }
            }
        }

        loop {
            // Cooperative shutdown: observed between claim attempts only.
            if self.cancel.is_cancelled() {
                break;
            }

            match claim::claim_next(&self.db, &worker_name, &self.work).await {
                Ok(Some(job_id)) => {
                    tracing::info!(worker_name = %worker_name, %job_id, "job finished");
                    self.idle.reset();
                }
                Ok(None) => {
                    tracing::debug!(worker_name = %worker_name, "no work available");
                    let delay = self.idle.next_delay();
                    self.idle_wait(delay).await;
                }
                Err(err) if err.is_transient() => {
                    tracing::warn!(worker_name = %worker_name, error = %err, "claim attempt failed, retrying");
                    let delay = self.idle.next_delay();
                    self.idle_wait(delay).await;
                }
                Err(err) => {
                    // Work-body failures land here: the claim rolled back and
                    // the job is queued again for any worker to retry.
                    tracing::error!(worker_name = %worker_name, error = %err, "claim attempt failed");
                    let delay = self.idle.next_delay();
                    self.idle_wait(delay).await;
                }
            }
        }

        tracing::info!(worker_name = %worker_name, "worker stopped");
    }

    /// Waits out an idle period.
    ///
    /// Returns early on cancellation or on an enqueue wake-up. A listener
    /// that errors is dropped; the worker falls back to pure polling.
    async fn idle_wait(&mut self, delay: Duration) {
        match self.wakeups.take() {
            Some(mut listener) => {
                let keep_listener = tokio::select! {
                    _ = self.cancel.cancelled() => true,
                    _ = tokio::time::sleep(delay) => true,
                    res = listener.recv() => match res {
                        Ok(notif) => {
                            tracing::debug!(job_id = %notif.job_id, "woken up by enqueue notification");
                            self.idle.reset();
                            true
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "wake-up listener failed, relying on polling");
                            false
                        }
                    },
                };
                if keep_listener {
                    self.wakeups = Some(listener);
                }
            }
            None => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}
