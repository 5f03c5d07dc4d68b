//! Idle polling schedule
//!
//! When the queue is empty the worker must not hot-spin against the store.
//! Successive empty polls back off exponentially up to a cap; any claimed
//! job resets the schedule.

use std::time::Duration;

/// Capped exponential backoff for idle polling.
#[derive(Debug, Clone)]
pub struct IdleBackoff {
    min_delay: Duration,
    max_delay: Duration,
    current: Duration,
}

impl IdleBackoff {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            min_delay,
            max_delay,
            current: min_delay,
        }
    }

    /// Returns the next idle delay and doubles the schedule up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max_delay);
        delay
    }

    /// Resets the schedule to the minimum delay.
    ///
    /// Called after a successful claim or an external wake-up, both of which
    /// suggest more work may be immediately available.
    pub fn reset(&mut self) {
        self.current = self.min_delay;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::IdleBackoff;

    #[test]
    fn doubles_up_to_the_cap() {
        let mut backoff = IdleBackoff::new(Duration::from_millis(100), Duration::from_millis(500));

        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
    }

    #[test]
    fn reset_returns_to_the_minimum() {
        let mut backoff = IdleBackoff::new(Duration::from_millis(100), Duration::from_secs(5));

        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();

        assert_eq!(backoff.next_delay(), Duration::from_millis(100));
    }
}
