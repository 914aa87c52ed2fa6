// Poll pacing and cooperative cancellation for the status loop

use codepad_common::config::JudgeConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed(Duration),
    /// `initial * factor^(attempt - 1)`, never above `max`
    Exponential {
        initial: Duration,
        factor: f64,
        max: Duration,
    },
}

/// How many status fetches to make and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(10, Duration::from_secs(1))
    }
}

impl PollPolicy {
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(interval),
        }
    }

    pub fn exponential(max_attempts: u32, initial: Duration, factor: f64, max: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { initial, factor, max },
        }
    }

    pub fn from_config(config: &JudgeConfig) -> Self {
        Self::fixed(config.poll_attempts, config.poll_interval)
    }

    /// At least one fetch is always made
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after the given 1-based attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(interval) => interval,
            Backoff::Exponential { initial, factor, max } => {
                let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let secs = initial.as_secs_f64() * factor.max(1.0).powi(exp);
                if !secs.is_finite() || secs >= max.as_secs_f64() {
                    max
                } else {
                    Duration::from_secs_f64(secs)
                }
            }
        }
    }

    /// Worst-case time spent sleeping before giving up
    pub fn total_wait(&self) -> Duration {
        (1..self.attempts()).map(|a| self.delay_for(a)).sum()
    }
}

/// Sender side: call [`CancelHandle::cancel`] to stop an in-progress execution
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiver side, checked between poll attempts and while sleeping
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

pub fn cancellation() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, Cancellation { rx })
}

impl Cancellation {
    /// A token that is never cancelled
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if every handle was dropped first.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.attempts(), 10);
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(9), Duration::from_secs(1));
        // No sleep after the last attempt
        assert_eq!(policy.total_wait(), Duration::from_secs(9));
    }

    #[test]
    fn test_zero_attempts_still_polls_once() {
        let policy = PollPolicy::fixed(0, Duration::ZERO);
        assert_eq!(policy.attempts(), 1);
    }

    #[test]
    fn test_exponential_is_bounded() {
        let policy = PollPolicy::exponential(
            10,
            Duration::from_millis(100),
            2.0,
            Duration::from_millis(1000),
        );
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(4), Duration::from_millis(800));
        assert_eq!(policy.delay_for(5), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(1000));
    }

    #[test]
    fn test_policy_from_config() {
        let config = JudgeConfig {
            poll_attempts: 4,
            poll_interval: Duration::from_millis(50),
            ..JudgeConfig::default()
        };
        assert_eq!(
            PollPolicy::from_config(&config),
            PollPolicy::fixed(4, Duration::from_millis(50))
        );
    }

    #[tokio::test]
    async fn test_cancel_wakes_waiter() {
        let (handle, mut cancel) = cancellation();
        assert!(!cancel.is_cancelled());

        let waiter = tokio::spawn(async move {
            cancel.cancelled().await;
            true
        });
        handle.cancel();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_never_does_not_fire() {
        let mut cancel = Cancellation::never();
        assert!(!cancel.is_cancelled());
        let fired = tokio::time::timeout(Duration::from_millis(20), cancel.cancelled()).await;
        assert!(fired.is_err());
    }
}
