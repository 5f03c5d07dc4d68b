//! Worker service configuration

use std::time::Duration;

use queue_db::WorkerName;

/// Default minimum idle delay between claim attempts on an empty queue.
pub const DEFAULT_MIN_IDLE_DELAY: Duration = Duration::from_millis(100);

/// Default cap for the idle delay.
pub const DEFAULT_MAX_IDLE_DELAY: Duration = Duration::from_secs(5);

/// Configuration for a claiming worker.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity recorded in completion records for work done by this process
    pub worker_name: WorkerName,

    /// Minimum idle delay between claim attempts on an empty queue
    pub min_idle_delay: Duration,

    /// Cap for the exponential idle delay
    pub max_idle_delay: Duration,

    /// Whether to hold a LISTEN connection for enqueue wake-ups
    ///
    /// Wake-ups only cut idle latency; the worker polls either way.
    pub listen_for_wakeups: bool,
}

impl Config {
    /// Creates a configuration with the default idle schedule and wake-ups enabled.
    pub fn new(worker_name: WorkerName) -> Self {
        Self {
            worker_name,
            min_idle_delay: DEFAULT_MIN_IDLE_DELAY,
            max_idle_delay: DEFAULT_MAX_IDLE_DELAY,
            listen_for_wakeups: true,
        }
    }

    /// Configures the idle delay bounds.
    pub fn with_idle_delays(mut self, min: Duration, max: Duration) -> Self {
        self.min_idle_delay = min;
        self.max_idle_delay = max;
        self
    }

    /// Disables the LISTEN wake-up connection.
    pub fn without_wakeups(mut self) -> Self {
        self.listen_for_wakeups = false;
        self
    }
}
