// Bounded retry with exponential backoff and jitter.
//
// Only transient errors (transport, timeout) are retried. Authentication
// errors and soft failures pass straight through to the caller.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{error, warn};

use crate::error::Error;

/// Retry tuning. Defaults: 3 retries, 1s base, 30s cap, up to 10% jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the random jitter as a fraction of the delay.
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter_ratio: 0.1,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// `min(2^attempt * base, cap)`, before jitter.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Backoff delay plus uniform jitter in `[0, jitter_ratio * delay]`.
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let delay = self.backoff_delay(attempt);
        let ratio = self.jitter_ratio.max(0.0);
        let jitter = rand::thread_rng().gen_range(0.0..=ratio);
        delay + delay.mul_f64(jitter)
    }
}

/// Run `op`, retrying transient failures per `policy` with `tokio::time::sleep`
/// between attempts. The last error is returned once retries are exhausted.
pub async fn retry_with_backoff<T, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    retry_with_sleep(policy, op, tokio::time::sleep).await
}

/// [`retry_with_backoff`] with an injectable sleep function.
pub(crate) async fn retry_with_sleep<T, F, Fut, S, SFut>(
    policy: &RetryPolicy,
    mut op: F,
    mut sleep: S,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.jittered_delay(attempt);
                warn!(
                    error = %err,
                    retry = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis(),
                    "request failed, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_transient() {
                    error!(error = %err, "maximum retries reached");
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            ..RetryPolicy::default()
        }
    }

    /// Fails with a timeout `failures` times, then succeeds.
    /// Returns (result, attempts, sleeps).
    async fn run_flaky(failures: u32, max_retries: u32) -> (Result<u32, Error>, u32, u32) {
        let attempts = Cell::new(0u32);
        let sleeps = Cell::new(0u32);
        let result = retry_with_sleep(
            &fast_policy(max_retries),
            || {
                let n = attempts.get();
                attempts.set(n + 1);
                async move {
                    if n < failures {
                        Err(Error::Timeout { timeout_secs: 10 })
                    } else {
                        Ok(n)
                    }
                }
            },
            |_| {
                sleeps.set(sleeps.get() + 1);
                std::future::ready(())
            },
        )
        .await;
        (result, attempts.get(), sleeps.get())
    }

    #[tokio::test]
    async fn succeeds_when_failures_within_budget() {
        for failures in 0..=3 {
            let (result, attempts, sleeps) = run_flaky(failures, 3).await;
            assert!(result.is_ok(), "failures={failures}");
            assert_eq!(attempts, failures + 1);
            assert_eq!(sleeps, failures);
        }
    }

    #[tokio::test]
    async fn fails_when_failures_exceed_budget() {
        let (result, attempts, sleeps) = run_flaky(4, 3).await;
        assert!(matches!(result, Err(Error::Timeout { .. })));
        assert_eq!(attempts, 4);
        assert_eq!(sleeps, 3);
    }

    #[tokio::test]
    async fn zero_retries_never_sleeps() {
        let (result, attempts, sleeps) = run_flaky(1, 0).await;
        assert!(result.is_err());
        assert_eq!(attempts, 1);
        assert_eq!(sleeps, 0);
    }

    #[tokio::test]
    async fn auth_error_bypasses_backoff() {
        let attempts = Cell::new(0u32);
        let sleeps = Cell::new(0u32);
        let result: Result<(), Error> = retry_with_sleep(
            &fast_policy(3),
            || {
                attempts.set(attempts.get() + 1);
                async { Err(Error::auth("token expired")) }
            },
            |_| {
                sleeps.set(sleeps.get() + 1);
                std::future::ready(())
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Authentication { .. })));
        assert_eq!(attempts.get(), 1);
        assert_eq!(sleeps.get(), 0);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(5), Duration::from_secs(30));
        assert_eq!(policy.backoff_delay(40), Duration::from_secs(30));
    }

    #[test]
    fn jitter_stays_within_ten_percent() {
        let policy = RetryPolicy::default();
        for attempt in 0..6 {
            let base = policy.backoff_delay(attempt);
            let delay = policy.jittered_delay(attempt);
            assert!(delay >= base);
            assert!(delay <= base + base.mul_f64(0.1) + Duration::from_nanos(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn real_sleep_path_retries() {
        let attempts = Cell::new(0u32);
        let result = retry_with_backoff(&fast_policy(2), || {
            let n = attempts.get();
            attempts.set(n + 1);
            async move {
                if n == 0 {
                    Err(Error::Timeout { timeout_secs: 1 })
                } else {
                    Ok(())
                }
            }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.get(), 2);
    }
}
