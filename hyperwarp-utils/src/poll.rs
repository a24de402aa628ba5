use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

/// Errors that end a poll without the condition being met
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The deadline passed before the step reported a value
    #[error("Timed out after {attempts} attempts ({elapsed:?})")]
    Timeout {
        /// Number of times the step was called
        attempts: u32,
        /// Time spent polling
        elapsed: Duration,
    },
    /// The step failed too many times in a row
    #[error("Giving up after {errors} consecutive poll errors, last: {last:#}")]
    TooManyErrors {
        /// Number of consecutive failures
        errors: u32,
        /// The last error returned by the step
        last: anyhow::Error,
    },
}

/// Calls a step at a fixed interval until it yields a value, the deadline
/// passes or it keeps failing.
#[derive(clap::Args, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FixedIntervalPoller {
    /// Delay between two polls in milliseconds
    #[arg(
        long = "poll-interval-ms",
        default_value_t = default_interval_ms(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Give up once this many milliseconds have passed
    #[arg(long = "poll-timeout-ms", default_value_t = default_timeout_ms())]
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Give up after this many consecutive failed polls
    #[arg(long = "poll-max-errors", default_value_t = default_max_consecutive_errors())]
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
}

/// Shortest interval between two polls
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

fn default_interval_ms() -> u64 {
    500
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_max_consecutive_errors() -> u32 {
    5
}

impl Default for FixedIntervalPoller {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
            max_consecutive_errors: default_max_consecutive_errors(),
        }
    }
}

impl FixedIntervalPoller {
    /// Create a new poller
    pub fn new(interval: Duration, timeout: Duration, max_consecutive_errors: u32) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            timeout_ms: timeout.as_millis() as u64,
            max_consecutive_errors,
        }
    }

    /// Polling interval, never shorter than [MIN_INTERVAL]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms).max(MIN_INTERVAL)
    }

    /// Polling deadline, counted from the first call
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Call `step` until it returns `Ok(Some(_))`.
    ///
    /// `Ok(None)` means "not yet" and resets the error counter. An `Err` is
    /// logged and tolerated up to `max_consecutive_errors` times in a row.
    /// A step still running at the deadline is dropped.
    pub async fn poll_until<T, F, Fut>(&self, mut step: F) -> Result<T, PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<Option<T>>>,
    {
        let max_errors = self.max_consecutive_errors.max(1);
        let timeout = self.timeout();
        let start = Instant::now();

        let mut interval = tokio::time::interval(self.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut attempts = 0u32;
        let mut consecutive_errors = 0u32;

        loop {
            // first tick completes immediately
            interval.tick().await;
            attempts += 1;

            let remaining = timeout.saturating_sub(start.elapsed());
            let Ok(result) = tokio::time::timeout(remaining, step()).await else {
                return Err(PollError::Timeout {
                    attempts,
                    elapsed: start.elapsed(),
                });
            };

            match result {
                Ok(Some(value)) => {
                    tracing::debug!(attempts, "Poll condition met after {:?}", start.elapsed());
                    return Ok(value);
                }
                Ok(None) => {
                    consecutive_errors = 0;
                }
                Err(err) => {
                    consecutive_errors += 1;
                    tracing::warn!(
                        "Poll attempt {} failed ({}/{}): {:#}",
                        attempts,
                        consecutive_errors,
                        max_errors,
                        err
                    );

                    if consecutive_errors >= max_errors {
                        return Err(PollError::TooManyErrors {
                            errors: consecutive_errors,
                            last: err,
                        });
                    }
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(PollError::Timeout { attempts, elapsed });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn fast_poller(timeout_ms: u64, max_errors: u32) -> FixedIntervalPoller {
        FixedIntervalPoller::new(
            Duration::from_millis(5),
            Duration::from_millis(timeout_ms),
            max_errors,
        )
    }

    #[test]
    fn test_defaults() {
        let poller = FixedIntervalPoller::default();
        assert_eq!(poller.interval(), Duration::from_millis(500));
        assert_eq!(poller.timeout(), Duration::from_secs(60));
        assert_eq!(poller.max_consecutive_errors, 5);
    }

    #[test]
    fn test_serde_defaults() {
        let poller: FixedIntervalPoller = serde_json::from_str(r#"{"interval_ms": 10}"#).unwrap();
        assert_eq!(poller.interval_ms, 10);
        assert_eq!(poller.timeout_ms, 60_000);
    }

    #[tokio::test]
    async fn test_returns_value_once_ready() {
        let calls = Arc::new(AtomicU32::new(0));

        let value = fast_poller(1_000, 5)
            .poll_until(|| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok((n == 3).then_some(n))
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stalled_step_times_out() {
        let poller = fast_poller(50, 3);
        let poll = poller.poll_until(|| std::future::pending::<anyhow::Result<Option<()>>>());

        let err = tokio::time::timeout(Duration::from_secs(2), poll)
            .await
            .expect("poll should end at its own deadline")
            .unwrap_err();

        match err {
            PollError::Timeout { attempts, elapsed } => {
                assert_eq!(attempts, 1);
                assert!(elapsed >= Duration::from_millis(50));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_zero_interval_is_clamped() {
        let poller = FixedIntervalPoller::new(Duration::ZERO, Duration::from_millis(50), 3);
        assert_eq!(poller.interval(), MIN_INTERVAL);

        let value = poller
            .poll_until(|| async { Ok(Some(7)) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_cli_rejects_zero_interval() {
        use clap::Parser;

        #[derive(clap::Parser)]
        struct Args {
            #[command(flatten)]
            poll: FixedIntervalPoller,
        }

        assert!(Args::try_parse_from(["poll", "--poll-interval-ms", "0"]).is_err());
        let args = Args::try_parse_from(["poll", "--poll-interval-ms", "1"]).unwrap();
        assert_eq!(args.poll.interval_ms, 1);
    }

    #[tokio::test]
    async fn test_times_out() {
        let err = fast_poller(30, 5)
            .poll_until(|| async { Ok::<Option<()>, anyhow::Error>(None) })
            .await
            .unwrap_err();

        match err {
            PollError::Timeout { attempts, elapsed } => {
                assert!(attempts >= 2);
                assert!(elapsed >= Duration::from_millis(30));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_too_many_consecutive_errors() {
        let err = fast_poller(1_000, 3)
            .poll_until(|| async { Err::<Option<()>, _>(anyhow::anyhow!("connection refused")) })
            .await
            .unwrap_err();

        match err {
            PollError::TooManyErrors { errors, last } => {
                assert_eq!(errors, 3);
                assert!(last.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_pending_result_resets_error_count() {
        let calls = Arc::new(AtomicU32::new(0));

        // errors on odd calls, pending on even calls, ready on the 8th
        let value = fast_poller(1_000, 2)
            .poll_until(|| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    match n {
                        8 => Ok(Some("ready")),
                        n if n % 2 == 1 => Err(anyhow::anyhow!("flaky")),
                        _ => Ok(None),
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, "ready");
    }
}
