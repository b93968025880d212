//! CloudSift error types

use crate::remote::RemoteError;
use thiserror::Error;

/// Errors produced by CloudSift
///
/// Everything except [`SiftError::Remote`] is raised by CloudSift itself and
/// is never worth retrying.
#[derive(Error, Debug)]
pub enum SiftError {
    #[error(
        "the target {target:?} has an invalid format, \
         the expected format is '<type>.<id>' (ex: aws_instance.i-0abc123)"
    )]
    FilterTargetsInvalid { target: String },

    #[error("Invalid tag {0:?}: the expected format is 'NAME:VALUE'")]
    InvalidTag(String),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl SiftError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SiftError::FilterTargetsInvalid { .. } => ErrorKind::FilterTargetsInvalid,
            SiftError::InvalidTag(_) => ErrorKind::InvalidTag,
            SiftError::Remote(_) => ErrorKind::Remote,
        }
    }

    /// Whether the error was raised locally rather than by a provider API
    pub fn is_local(&self) -> bool {
        !matches!(self, SiftError::Remote(_))
    }
}

/// Discoverable kind of a [`SiftError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FilterTargetsInvalid,
    InvalidTag,
    Remote,
}

impl ErrorKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::FilterTargetsInvalid => "filter_targets_invalid",
            ErrorKind::InvalidTag => "invalid_tag",
            ErrorKind::Remote => "remote",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

pub type Result<T> = std::result::Result<T, SiftError>;
