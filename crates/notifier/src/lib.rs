//! Core domain for reporting lifecycle events as commit statuses.
//!
//! This crate contains the decision logic of a commit-status notifier: how a
//! generic lifecycle event becomes a hosting-service status, how duplicate
//! reports are suppressed, and how the target repository is addressed.
//! Infrastructure crates implement [`CommitStatusApi`]; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`address`] | Host/owner/repository address parsing |
//! | [`identifiers`] | Newtype identifiers (`Owner`, `RepositoryName`, `Revision`) |
//! | [`types`] | Events, status states, and status records |
//! | [`translate`] | Event → state / context / description mapping |
//! | [`reporter`] | `StatusReporter`: revision lookup, dedup, create |
//! | [`ports`] | `CommitStatusApi` and `Notifier` traits |
//! | [`observer`] | Injected observation hooks |
//! | [`errors`] | Error and retry-policy types |

pub mod address;
pub mod errors;
pub mod identifiers;
pub mod observer;
pub mod ports;
pub mod reporter;
pub mod translate;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use address::{parse_address, split_identifier, EndpointIdentity};
pub use errors::{ConfigurationError, ReportError, RetryPolicy, StatusApiError};
pub use identifiers::{HashAlgorithm, Owner, RepositoryName, Revision};
pub use observer::{NoopObserver, ReportObserver, TracingObserver};
pub use ports::{CommitStatusApi, Notifier};
pub use reporter::{is_duplicate, revision_from, StatusReporter, STATUS_PAGE_SIZE};
pub use translate::{format_name_and_description, to_status_state};
pub use types::{
    LifecycleEvent, ListOptions, ObjectReference, Severity, StatusInput, StatusRecord,
    RemoteState, StatusState, UnknownStatusState, PROGRESSING_REASON, REVISION_METADATA_KEY,
    SUMMARY_METADATA_KEY,
};
