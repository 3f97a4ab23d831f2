//! Observation hooks for the reporter.
//!
//! The reporter never decides on its own whether to log; it calls an injected
//! [`ReportObserver`]. [`TracingObserver`] is the default and forwards to
//! `tracing`; [`NoopObserver`] discards everything.

use tracing::{debug, info, warn};

use crate::{EndpointIdentity, Revision, StatusApiError, StatusInput, StatusRecord};

/// Receives notifications about the write decisions a reporter makes.
///
/// All methods default to doing nothing.
pub trait ReportObserver: Send + Sync {
    /// An identical status already exists; nothing will be written.
    fn duplicate_skipped(
        &self,
        _identity: &EndpointIdentity,
        _revision: &Revision,
        _status: &StatusInput,
    ) {
    }

    /// A status is about to be created.
    fn create_started(
        &self,
        _identity: &EndpointIdentity,
        _revision: &Revision,
        _status: &StatusInput,
    ) {
    }

    /// The status was created.
    fn created(&self, _identity: &EndpointIdentity, _revision: &Revision, _record: &StatusRecord) {}

    /// Creating the status failed.
    fn create_failed(
        &self,
        _identity: &EndpointIdentity,
        _revision: &Revision,
        _status: &StatusInput,
        _error: &StatusApiError,
    ) {
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReportObserver for NoopObserver {}

/// Observer that emits structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReportObserver for TracingObserver {
    fn duplicate_skipped(
        &self,
        identity: &EndpointIdentity,
        revision: &Revision,
        status: &StatusInput,
    ) {
        debug!(
            owner = %identity.owner(),
            repo = %identity.repository(),
            commit_hash = %revision,
            context = %status.context,
            state = %status.state,
            "Skipping duplicate commit status"
        );
    }

    fn create_started(&self, identity: &EndpointIdentity, revision: &Revision, status: &StatusInput) {
        debug!(
            base_url = identity.host_url(),
            owner = %identity.owner(),
            repo = %identity.repository(),
            commit_hash = %revision,
            context = %status.context,
            state = %status.state,
            description = %status.description,
            "Creating commit status"
        );
    }

    fn created(&self, identity: &EndpointIdentity, revision: &Revision, record: &StatusRecord) {
        info!(
            owner = %identity.owner(),
            repo = %identity.repository(),
            commit_hash = %revision,
            context = %record.context,
            state = ?record.state,
            "Commit status created"
        );
    }

    fn create_failed(
        &self,
        identity: &EndpointIdentity,
        revision: &Revision,
        status: &StatusInput,
        error: &StatusApiError,
    ) {
        warn!(
            owner = %identity.owner(),
            repo = %identity.repository(),
            commit_hash = %revision,
            context = %status.context,
            error = %error,
            "Failed to create commit status"
        );
    }
}
