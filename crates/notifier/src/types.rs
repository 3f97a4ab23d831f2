//! Value types shared between the translator, the reporter, and the
//! hosting-service clients.
//!
//! Inbound events ([`LifecycleEvent`]) are produced by an external event
//! source and consumed read-only. Outbound statuses ([`StatusInput`]) and the
//! records read back from the service ([`StatusRecord`]) use the closed
//! [`StatusState`] enumeration; conversion from the service's wire strings
//! happens at the client boundary.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata key under which an event carries the revision it refers to.
pub const REVISION_METADATA_KEY: &str = "revision";

/// Metadata key for an optional summary that is prefixed to the status context.
pub const SUMMARY_METADATA_KEY: &str = "summary";

/// Reason tag marking an event as "still in progress".
pub const PROGRESSING_REASON: &str = "Progressing";

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// Severity of a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Diagnostic chatter; never reported on its own.
    Trace,
    /// The resource reached a healthy state.
    Info,
    /// The resource failed.
    Error,
}

impl Severity {
    /// Returns the wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectReference {
    /// Resource kind, e.g. `"Kustomization"`.
    pub kind: String,
    /// Resource name.
    pub name: String,
    /// Resource namespace; empty for cluster-scoped resources.
    #[serde(default)]
    pub namespace: String,
}

impl ObjectReference {
    /// Creates a reference to a namespaced resource.
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// A structured lifecycle event describing a change to a deployed resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    /// The resource this event is about.
    pub involved_object: ObjectReference,

    /// Event severity.
    pub severity: Severity,

    /// Reason tags, e.g. `{"ReconciliationSucceeded"}` or `{"Progressing"}`.
    #[serde(default)]
    pub reasons: BTreeSet<String>,

    /// Free-form human-readable message.
    #[serde(default)]
    pub message: String,

    /// String metadata; must carry [`REVISION_METADATA_KEY`] to be reportable.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Name of the component that emitted the event.
    #[serde(default)]
    pub reporting_controller: String,
}

impl LifecycleEvent {
    /// Creates an event with no reasons, message, or metadata.
    pub fn new(involved_object: ObjectReference, severity: Severity) -> Self {
        Self {
            involved_object,
            severity,
            reasons: BTreeSet::new(),
            message: String::new(),
            metadata: BTreeMap::new(),
            reporting_controller: String::new(),
        }
    }

    /// Adds a reason tag.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.insert(reason.into());
        self
    }

    /// Sets the human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Inserts a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the event carries `reason`.
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reasons.contains(reason)
    }

    /// Returns the metadata value for `key`, if any.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Commit statuses
// ---------------------------------------------------------------------------

/// State of a commit status on the hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Work on the revision is still in progress.
    Pending,
    /// The revision was applied successfully.
    Success,
    /// Applying the revision failed.
    Failure,
    /// The status could not be determined.
    Error,
}

impl StatusState {
    /// All states, in declaration order.
    pub const ALL: [StatusState; 4] = [Self::Pending, Self::Success, Self::Failure, Self::Error];

    /// Returns the wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wire state string outside the [`StatusState`] set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown commit status state '{0}'")]
pub struct UnknownStatusState(pub String);

impl FromStr for StatusState {
    type Err = UnknownStatusState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "error" => Ok(Self::Error),
            other => Err(UnknownStatusState(other.to_string())),
        }
    }
}

/// A state as reported by the hosting service.
///
/// Services may report states outside [`StatusState`] (Gitea's `warning`).
/// Such a state is still a state: it never equals a [`StatusState`] but the
/// record carrying it is the newest for its context all the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteState {
    /// One of the states this crate writes.
    Known(StatusState),
    /// Any other non-empty state string.
    Other(String),
}

impl RemoteState {
    /// Converts a wire string; `None` for an empty string.
    pub fn from_wire(value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        Some(match value.parse::<StatusState>() {
            Ok(state) => Self::Known(state),
            Err(UnknownStatusState(other)) => Self::Other(other),
        })
    }
}

impl From<StatusState> for RemoteState {
    fn from(state: StatusState) -> Self {
        Self::Known(state)
    }
}

/// A commit status as read back from the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Status context (the "check name").
    pub context: String,
    /// State; `None` when the service reported no state.
    pub state: Option<RemoteState>,
    /// Short description.
    pub description: String,
}

impl StatusRecord {
    /// Returns `true` if every field needed for duplicate detection is present.
    pub fn is_comparable(&self) -> bool {
        !self.context.is_empty() && self.state.is_some() && !self.description.is_empty()
    }
}

/// A commit status to be created on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInput {
    /// Status state.
    pub state: StatusState,
    /// Short description.
    pub description: String,
    /// Status context (the "check name").
    pub context: String,
    /// Deep link; always empty for statuses created by this crate.
    pub target_url: String,
}

impl StatusInput {
    /// Creates a status with an empty target URL.
    pub fn new(
        state: StatusState,
        context: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            state,
            description: description.into(),
            context: context.into(),
            target_url: String::new(),
        }
    }
}

/// Paging parameters for listing commit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: u32,
    /// Maximum number of records per page.
    pub page_size: u32,
}

impl ListOptions {
    /// The first page with the given size.
    pub fn first_page(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }
}
