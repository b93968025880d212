//! CloudSift core
//!
//! This crate decides which discovered cloud resources get processed and
//! shields provider API calls from transient failures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  CloudSift CLI                   │
//! │             (sift validate/targets)              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                cloudsift-core                    │
//! │  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │    Filter    │  │       RetryPolicy        │ │
//! │  │ include/excl │  │  Classify (local/remote) │ │
//! │  │   targets    │  │                          │ │
//! │  └──────────────┘  └──────────────────────────┘ │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cloudsift_core::{Filter, RemoteError, retry};
//! use std::time::Duration;
//!
//! let filter = Filter::new()
//!     .with_exclude(["aws_iam_user"])
//!     .with_targets(["aws_instance.i-0abc"]);
//! filter.validate().unwrap();
//! assert!(filter.is_excluded(["aws_iam_user"]));
//!
//! let mut calls = 0;
//! let result = retry(
//!     || {
//!         calls += 1;
//!         if calls == 1 {
//!             Err(RemoteError::new("ec2", "Throttling", "Rate exceeded"))
//!         } else {
//!             Ok(calls)
//!         }
//!     },
//!     3,
//!     Duration::ZERO,
//! );
//! assert_eq!(result.unwrap(), 2);
//! ```

pub mod error;
pub mod filter;
pub mod remote;
pub mod retry;
pub mod tag;

// Re-exports
pub use error::{ErrorKind, Result, SiftError};
pub use filter::{Filter, TARGET_SEPARATOR, TargetGroups};
pub use remote::RemoteError;
pub use retry::{Classify, DEFAULT_ATTEMPTS, DEFAULT_INTERVAL, RetryPolicy, retry, retry_default};
pub use tag::Tag;
