//! Retry for provider API calls
//!
//! Operations are retried with a fixed interval, only while the error is a
//! transient one reported by the remote provider (retryable, throttled or
//! expired credentials). Errors raised by CloudSift itself are returned on
//! the spot since retrying them cannot succeed.

use crate::error::SiftError;
use crate::remote::RemoteError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Retry classification of an error
///
/// `is_local` wins over everything else: an error that reports itself as
/// local is never retried, whatever the other answers are.
pub trait Classify {
    /// Raised by CloudSift itself, not by a remote provider
    fn is_local(&self) -> bool {
        false
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn is_throttle(&self) -> bool {
        false
    }

    fn is_expired_creds(&self) -> bool {
        false
    }

    fn is_transient(&self) -> bool {
        !self.is_local() && (self.is_retryable() || self.is_throttle() || self.is_expired_creds())
    }
}

impl Classify for RemoteError {
    fn is_retryable(&self) -> bool {
        RemoteError::is_retryable(self)
    }

    fn is_throttle(&self) -> bool {
        RemoteError::is_throttle(self)
    }

    fn is_expired_creds(&self) -> bool {
        RemoteError::is_expired_creds(self)
    }
}

impl Classify for SiftError {
    fn is_local(&self) -> bool {
        SiftError::is_local(self)
    }

    fn is_retryable(&self) -> bool {
        matches!(self, SiftError::Remote(e) if e.is_retryable())
    }

    fn is_throttle(&self) -> bool {
        matches!(self, SiftError::Remote(e) if e.is_throttle())
    }

    fn is_expired_creds(&self) -> bool {
        matches!(self, SiftError::Remote(e) if e.is_expired_creds())
    }
}

/// Anything that is not a known remote error was built with `anyhow` by
/// CloudSift and counts as local.
impl Classify for anyhow::Error {
    fn is_local(&self) -> bool {
        match self.downcast_ref::<SiftError>() {
            Some(e) => e.is_local(),
            None => self.downcast_ref::<RemoteError>().is_none(),
        }
    }

    fn is_retryable(&self) -> bool {
        remote_of(self).is_some_and(|e| e.is_retryable())
    }

    fn is_throttle(&self) -> bool {
        remote_of(self).is_some_and(|e| e.is_throttle())
    }

    fn is_expired_creds(&self) -> bool {
        remote_of(self).is_some_and(|e| e.is_expired_creds())
    }
}

fn remote_of(err: &anyhow::Error) -> Option<&RemoteError> {
    match err.downcast_ref::<SiftError>() {
        Some(SiftError::Remote(e)) => Some(e),
        Some(_) => None,
        None => err.downcast_ref::<RemoteError>(),
    }
}

/// Number of attempts and wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total number of calls, including the first one
    #[serde(deserialize_with = "at_least_one")]
    pub attempts: u32,

    /// Wait between two calls, in (possibly fractional) seconds on disk
    #[serde(rename = "interval_secs", with = "secs")]
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// `attempts` below 1 is raised to 1
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Calls `op` until it succeeds, blocking the thread between attempts
    ///
    /// On failure the error of the last call is returned as is.
    pub fn run<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify + Display,
    {
        self.run_with_sleep(op, std::thread::sleep)
    }

    /// Same as [`RetryPolicy::run`] without blocking the runtime while waiting
    pub async fn run_async<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + Display,
    {
        let mut attempts_left = self.attempts;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            attempts_left = attempts_left.saturating_sub(1);

            if !self.should_retry(&err, attempts_left) {
                return Err(err);
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    fn run_with_sleep<T, E, F, S>(&self, mut op: F, mut sleep: S) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        S: FnMut(Duration),
        E: Classify + Display,
    {
        let mut attempts_left = self.attempts;
        loop {
            let err = match op() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            attempts_left = attempts_left.saturating_sub(1);

            if !self.should_retry(&err, attempts_left) {
                return Err(err);
            }
            sleep(self.interval);
        }
    }

    fn should_retry<E: Classify + Display>(&self, err: &E, attempts_left: u32) -> bool {
        if err.is_local() {
            tracing::debug!(error = %err, "local error, not retrying");
            return false;
        }
        if attempts_left == 0 || !err.is_transient() {
            return false;
        }

        tracing::warn!(
            error = %err,
            attempts_left,
            interval_secs = self.interval.as_secs_f64(),
            "waiting for throttling error"
        );
        true
    }
}

/// Calls `op` up to `attempts` times, waiting `interval` after each
/// transient failure
pub fn retry<T, E, F>(op: F, attempts: u32, interval: Duration) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Classify + Display,
{
    RetryPolicy::new(attempts, interval).run(op)
}

/// [`retry`] with 3 attempts and a 30 seconds interval
pub fn retry_default<T, E, F>(op: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Classify + Display,
{
    RetryPolicy::default().run(op)
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    u32::deserialize(deserializer).map(|attempts| attempts.max(1))
}

mod secs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn throttled() -> SiftError {
        RemoteError::new("ec2", "Throttling", "Rate exceeded").into()
    }

    /// Runs `policy` recording every wait instead of sleeping
    fn run_recorded<T, E: Classify + Display>(
        policy: RetryPolicy,
        op: impl FnMut() -> Result<T, E>,
    ) -> (Result<T, E>, Vec<Duration>) {
        let waits = RefCell::new(Vec::new());
        let result = policy.run_with_sleep(op, |d| waits.borrow_mut().push(d));
        (result, waits.into_inner())
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_success_first_try() {
        let mut calls = 0;
        let (result, waits) = run_recorded(RetryPolicy::default(), || {
            calls += 1;
            Ok::<_, SiftError>("done")
        });

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 1);
        assert!(waits.is_empty());
    }

    #[test]
    fn test_transient_then_success() {
        let interval = Duration::from_secs(5);
        let mut calls = 0;
        let (result, waits) = run_recorded(RetryPolicy::new(3, interval), || {
            calls += 1;
            if calls < 3 { Err(throttled()) } else { Ok(calls) }
        });

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
        assert_eq!(waits, vec![interval, interval]);
    }

    #[test]
    fn test_local_error_is_not_retried() {
        let mut calls = 0;
        let (result, waits) = run_recorded(RetryPolicy::new(5, Duration::from_secs(1)), || {
            calls += 1;
            Err::<(), _>(SiftError::FilterTargetsInvalid {
                target: "badtarget".to_string(),
            })
        });

        assert!(matches!(result, Err(SiftError::FilterTargetsInvalid { .. })));
        assert_eq!(calls, 1);
        assert!(waits.is_empty());
    }

    #[test]
    fn test_single_attempt() {
        let mut calls = 0;
        let (result, waits) = run_recorded(RetryPolicy::new(1, Duration::from_secs(1)), || {
            calls += 1;
            Err::<(), _>(throttled())
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert!(waits.is_empty());
    }

    #[test]
    fn test_exhausted_returns_last_error() {
        let mut calls = 0;
        let (result, waits) = run_recorded(RetryPolicy::new(3, Duration::from_secs(1)), || {
            calls += 1;
            Err::<(), _>(RemoteError::new("ec2", "Throttling", format!("attempt {calls}")))
        });

        let err = result.unwrap_err();
        assert_eq!(err.message, "attempt 3");
        assert_eq!(calls, 3);
        assert_eq!(waits.len(), 2);
    }

    #[test]
    fn test_permanent_remote_error_is_not_retried() {
        let mut calls = 0;
        let (result, waits) = run_recorded(RetryPolicy::default(), || {
            calls += 1;
            Err::<(), _>(
                RemoteError::new("ec2", "UnauthorizedOperation", "denied").with_status(403),
            )
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert!(waits.is_empty());
    }

    #[test]
    fn test_expired_creds_are_retried() {
        let mut calls = 0;
        let (result, waits) = run_recorded(RetryPolicy::new(2, Duration::from_secs(1)), || {
            calls += 1;
            if calls == 1 {
                Err(RemoteError::new("sts", "ExpiredToken", "expired"))
            } else {
                Ok(())
            }
        });

        assert!(result.is_ok());
        assert_eq!(waits.len(), 1);
    }

    #[test]
    fn test_zero_attempts_calls_once() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.attempts, 1);

        let mut calls = 0;
        let (result, _) = run_recorded(policy, || {
            calls += 1;
            Err::<(), _>(throttled())
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_anyhow_classification() {
        let local = anyhow::anyhow!("something went wrong");
        assert!(local.is_local());
        assert!(!local.is_transient());

        let wrapped = anyhow::Error::from(SiftError::InvalidTag("env".into()));
        assert!(wrapped.is_local());

        let remote = anyhow::Error::from(RemoteError::new("ec2", "Throttling", "slow down"));
        assert!(!remote.is_local());
        assert!(remote.is_throttle());
        assert!(remote.is_transient());

        let sift_remote = anyhow::Error::from(throttled());
        assert!(!sift_remote.is_local());
        assert!(sift_remote.is_transient());
    }

    #[test]
    fn test_local_wins_over_remote_classification() {
        struct Ours;
        impl Display for Ours {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "ours")
            }
        }
        impl Classify for Ours {
            fn is_local(&self) -> bool {
                true
            }
            fn is_retryable(&self) -> bool {
                true
            }
        }

        assert!(!Ours.is_transient());
        let (result, waits) = run_recorded(RetryPolicy::default(), || Err::<(), _>(Ours));
        assert!(result.is_err());
        assert!(waits.is_empty());
    }

    #[test]
    fn test_retry_fn_with_zero_interval() {
        let mut calls = 0;
        let result = retry(
            || {
                calls += 1;
                if calls < 2 { Err(throttled()) } else { Ok(()) }
            },
            3,
            Duration::ZERO,
        );

        assert!(result.is_ok());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_retry_default_local_error_returns_immediately() {
        let start = std::time::Instant::now();
        let result = retry_default(|| Err::<(), _>(anyhow::anyhow!("bad input")));

        assert!(result.is_err());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_async() {
        let interval = Duration::from_secs(30);
        let start = tokio::time::Instant::now();
        let mut calls = 0;

        let result = RetryPolicy::new(3, interval)
            .run_async(|| {
                calls += 1;
                let attempt = calls;
                async move {
                    if attempt < 3 { Err(throttled()) } else { Ok(attempt) }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
        assert_eq!(start.elapsed(), interval * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_async_local_error() {
        let start = tokio::time::Instant::now();
        let result = RetryPolicy::default()
            .run_async(|| async { Err::<(), _>(SiftError::InvalidTag("nope".into())) })
            .await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_deserialize_policy() {
        let policy: RetryPolicy =
            serde_json::from_str(r#"{"attempts": 5, "interval_secs": 2}"#).unwrap();
        assert_eq!(policy, RetryPolicy::new(5, Duration::from_secs(2)));

        let policy: RetryPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn test_deserialize_zero_attempts_is_raised_to_one() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"attempts": 0}"#).unwrap();
        assert_eq!(policy.attempts, 1);
        assert_eq!(policy.interval, DEFAULT_INTERVAL);

        let policy: RetryPolicy = serde_yaml::from_str("attempts: 0\ninterval_secs: 1\n").unwrap();
        assert_eq!(policy, RetryPolicy::new(1, Duration::from_secs(1)));
    }

    #[test]
    fn test_sub_second_interval_round_trip() {
        let policy = RetryPolicy::new(2, Duration::from_millis(500));
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, r#"{"attempts":2,"interval_secs":0.5}"#);

        let back: RetryPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.interval, Duration::from_millis(500));
    }

    #[test]
    fn test_fractional_interval_from_yaml() {
        let policy: RetryPolicy = serde_yaml::from_str("interval_secs: 1.5\n").unwrap();
        assert_eq!(policy.interval, Duration::from_millis(1500));
    }

    #[test]
    fn test_negative_interval_is_rejected() {
        let result = serde_json::from_str::<RetryPolicy>(r#"{"interval_secs": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_hand_built_zero_attempts_calls_once() {
        let policy = RetryPolicy {
            attempts: 0,
            interval: Duration::from_secs(1),
        };

        let mut calls = 0;
        let (result, waits) = run_recorded(policy, || {
            calls += 1;
            Err::<(), _>(throttled())
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert!(waits.is_empty());
    }
}
