//! Error and retry-policy types for the commit-status notifier.
//!
//! Errors are split by the phase in which they occur:
//!
//! - [`ConfigurationError`]: produced while constructing a notifier. A notifier
//!   is never returned in a usable-but-broken state.
//! - [`ReportError`]: produced by a single [`crate::Notifier::report`] call.
//!   Input errors are raised before any network call is attempted.
//! - [`StatusApiError`]: produced by a [`crate::CommitStatusApi`]
//!   implementation when talking to the hosting service.
//!
//! [`RetryPolicy`] lets an outer caller decide whether a failed report is worth
//! re-submitting. The notifier itself never retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// - `Retryable`: transport failures, `429 Too Many Requests`, `5xx` responses.
/// - `NonRetryable`: invalid input, authentication failures, other `4xx` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt, taken from a `Retry-After`
        /// response header when the service supplied one. `None` means apply
        /// the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried without changing its input.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Construction-time errors
// ---------------------------------------------------------------------------

/// Errors raised while building a notifier from its configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The authentication token was empty.
    #[error("token cannot be empty")]
    EmptyToken,

    /// The address could not be split into a valid host URL and an
    /// `owner/repository` path.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The address as supplied by the caller.
        address: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The repository identifier did not consist of exactly two non-empty
    /// `/`-separated components.
    #[error("invalid repository id '{identifier}'")]
    InvalidIdentifier {
        /// The identifier as extracted from the address.
        identifier: String,
    },

    /// The underlying HTTP client could not be built (e.g. the custom trust
    /// root is not valid PEM).
    #[error("could not build hosting-service client: {message}")]
    ClientBuild {
        /// Description of the failure reported by the client library.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Hosting-service errors
// ---------------------------------------------------------------------------

/// Errors returned by a [`crate::CommitStatusApi`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusApiError {
    /// The request never produced an HTTP response (DNS, TLS, connection
    /// reset, timeout).
    #[error("request to hosting service failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The service answered with a non-success status code.
    #[error("hosting service responded with HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, as text, for diagnostics.
        body: String,
        /// Parsed `Retry-After` header, when present.
        retry_after: Option<Duration>,
    },

    /// The response body could not be decoded.
    #[error("could not decode hosting service response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },
}

impl StatusApiError {
    /// Returns whether the failed call may be repeated unchanged.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { .. } => RetryPolicy::Retryable { after: None },
            Self::Http {
                status,
                retry_after,
                ..
            } if *status == 429 || (500..600u16).contains(status) => RetryPolicy::Retryable {
                after: *retry_after,
            },
            Self::Http { .. } | Self::Decode { .. } => RetryPolicy::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-report errors
// ---------------------------------------------------------------------------

/// Errors returned by a single report call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The event metadata has no revision entry.
    #[error("missing revision metadata")]
    MissingRevision,

    /// The revision entry is present but is not a recognised commit hash.
    #[error("revision string format incorrect: '{revision}'")]
    InvalidRevision {
        /// The revision value as found in the event metadata.
        revision: String,
    },

    /// The event severity cannot be mapped to a commit status state.
    #[error("cannot convert event with severity '{severity}' to a commit status state")]
    UnknownSeverity {
        /// The severity carried by the event.
        severity: String,
    },

    /// Listing the existing statuses for the revision failed.
    #[error("could not list commit statuses: {source}")]
    ListStatuses {
        /// The underlying hosting-service error.
        #[source]
        source: StatusApiError,
    },

    /// Creating the new status failed.
    #[error(transparent)]
    Remote(#[from] StatusApiError),
}

impl ReportError {
    /// Returns whether re-submitting the same event could succeed.
    ///
    /// Input errors are never retryable; remote errors defer to
    /// [`StatusApiError::retry_policy`].
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::ListStatuses { source } | Self::Remote(source) => source.retry_policy(),
            Self::MissingRevision | Self::InvalidRevision { .. } | Self::UnknownSeverity { .. } => {
                RetryPolicy::NonRetryable
            }
        }
    }
}
