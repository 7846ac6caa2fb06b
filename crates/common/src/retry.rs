//! Retry policies and the sleep abstraction used by polling loops.
//!
//! The poller takes its delays through the [`Sleeper`] trait so tests can run
//! the loop without real timers.

use std::time::Duration;

/// A bounded retry budget: at most `max_attempts` attempts with a fixed
/// `delay` applied *before* each attempt, including the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts before giving up.
    pub max_attempts: u32,
    /// Delay applied before each attempt.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a new policy.
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }
}

/// Sleep abstraction so waiting loops can be driven deterministically in
/// tests.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// The default [Sleeper], backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A [Sleeper] that returns immediately. Intended for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSleep;

#[async_trait::async_trait]
impl Sleeper for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_holds_budget() {
        let policy = RetryPolicy::new(10, Duration::from_millis(3000));
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.delay, Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn no_sleep_returns_immediately() {
        let start = std::time::Instant::now();
        NoSleep.sleep(Duration::from_secs(60)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
