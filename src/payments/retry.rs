use std::time::Duration;

/// Bounded retry with linear backoff for calls to external payment providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 200,
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        Duration::from_millis(self.base_backoff_ms.saturating_mul(attempt as u64))
    }

    /// Whether another attempt is allowed after `attempt` attempts have failed.
    pub fn should_retry(&self, attempt: usize) -> bool {
        attempt < self.max_attempts.max(1)
    }

    /// Sum of every backoff sleep when all attempts fail.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts.max(1)).map(|n| self.delay_for_attempt(n)).sum()
    }

    /// Per-attempt budget so that every attempt and backoff fits inside `deadline`.
    ///
    /// When the backoff alone would use up the deadline, the attempts split it evenly
    /// and the last retries are cut short by the caller's deadline instead.
    pub fn attempt_timeout(&self, deadline: Duration) -> Duration {
        let attempts = self.max_attempts.max(1) as u32;
        let for_requests = deadline
            .checked_sub(self.total_backoff())
            .filter(|left| !left.is_zero())
            .unwrap_or(deadline);
        for_requests / attempts
    }
}
