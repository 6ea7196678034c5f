//! Bounded retry for reads against eventually-consistent backends.
//!
//! The policy is a fixed number of attempts with a fixed delay between them.
//! Only "absent" results are retried; errors are returned immediately so that
//! transport failures never get masked by the polling loop.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one. Never below 1.
    pub max_attempts: u32,
    /// Delay between two consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Suspends the calling task between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Poll `f` until it yields `Some`, at most `config.max_attempts` times.
///
/// Returns `Ok(None)` once every attempt came back empty. The delay is only
/// taken between attempts, never after the last one.
pub async fn poll_until_present<F, Fut, T, E>(
    config: &RetryConfig,
    sleeper: &dyn Sleeper,
    operation_name: &str,
    f: F,
) -> Result<Option<T>, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        if let Some(value) = f().await? {
            if attempt > 1 {
                info!(
                    operation = operation_name,
                    attempt, "Resource became visible after retry"
                );
            }
            return Ok(Some(value));
        }

        if attempt >= max_attempts {
            warn!(
                operation = operation_name,
                attempts = attempt,
                "Resource still absent after max attempts"
            );
            return Ok(None);
        }

        warn!(
            operation = operation_name,
            attempt,
            delay_ms = config.delay.as_millis() as u64,
            "Resource not found, retrying after delay"
        );
        sleeper.sleep(config.delay).await;
        attempt += 1;
    }
}
