//! Errors returned by remote provider APIs
//!
//! Providers map their SDK/CLI failures into [`RemoteError`] so the retry
//! executor can tell throttling and expired credentials apart from
//! permanent failures.

use thiserror::Error;

/// Error codes the provider APIs use for throttled requests
const THROTTLE_CODES: &[&str] = &[
    "ProvisionedThroughputExceededException",
    "ThrottledException",
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "RequestThrottled",
    "RequestThrottledException",
    "TooManyRequestsException",
    "PriorRequestNotComplete",
    "TransactionInProgressException",
    "EC2ThrottledException",
];

const EXPIRED_CREDS_CODES: &[&str] = &["ExpiredToken", "ExpiredTokenException", "RequestExpired"];

const RETRYABLE_CODES: &[&str] = &[
    "RequestError",
    "RequestTimeout",
    "ResponseTimeout",
    "RequestTimeoutException",
    "InternalError",
    "ServiceUnavailable",
];

const THROTTLE_STATUS: &[u16] = &[429, 502, 503, 504];

/// Error reported by a remote provider API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{service}: {code}: {message}{}", status_suffix(.status))]
pub struct RemoteError {
    /// Service that answered (e.g., "ec2", "s3")
    pub service: String,

    /// Provider error code (e.g., "Throttling")
    pub code: String,

    /// HTTP status code, if the transport exposed one
    pub status: Option<u16>,

    /// Provider error message
    pub message: String,
}

impl RemoteError {
    pub fn new(
        service: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            code: code.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Generic transient failure (timeouts, 5xx)
    pub fn is_retryable(&self) -> bool {
        if RETRYABLE_CODES.contains(&self.code.as_str()) {
            return true;
        }
        matches!(self.status, Some(s) if s >= 500 && s != 501)
    }

    pub fn is_throttle(&self) -> bool {
        THROTTLE_CODES.contains(&self.code.as_str())
            || self.status.is_some_and(|s| THROTTLE_STATUS.contains(&s))
    }

    pub fn is_expired_creds(&self) -> bool {
        EXPIRED_CREDS_CODES.contains(&self.code.as_str())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}
