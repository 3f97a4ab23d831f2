//! Commit-status reporting for a single repository.
//!
//! [`StatusReporter`] turns one [`LifecycleEvent`] into at most one
//! `create_status` call:
//!
//! 1. resolve the revision from the event metadata,
//! 2. translate the event into a state, context, and description,
//! 3. list the newest statuses already recorded for the revision,
//! 4. skip the write if the newest status with the same context is identical,
//! 5. otherwise create the status.
//!
//! Steps 1 and 2 happen before any network call, so malformed events never
//! reach the hosting service. Concurrent reports for the same revision may
//! both observe "no duplicate" and both write; that race is accepted.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::translate::{format_name_and_description, to_status_state};
use crate::{
    CommitStatusApi, EndpointIdentity, LifecycleEvent, ListOptions, Notifier, RemoteState,
    ReportError, ReportObserver, Revision, StatusInput, StatusRecord, TracingObserver, REVISION_METADATA_KEY,
};

/// Number of most-recent statuses inspected for duplicate detection.
pub const STATUS_PAGE_SIZE: u32 = 50;

/// Reports events as commit statuses on one repository through a
/// [`CommitStatusApi`].
pub struct StatusReporter<A> {
    identity: EndpointIdentity,
    api: A,
    observer: Arc<dyn ReportObserver>,
}

impl<A: CommitStatusApi> StatusReporter<A> {
    /// Creates a reporter that logs through [`TracingObserver`].
    pub fn new(identity: EndpointIdentity, api: A) -> Self {
        Self {
            identity,
            api,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ReportObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The repository this reporter writes to.
    pub fn identity(&self) -> &EndpointIdentity {
        &self.identity
    }

    /// The underlying hosting-service client.
    pub fn api(&self) -> &A {
        &self.api
    }

    #[instrument(
        skip(self, event),
        fields(
            owner = %self.identity.owner(),
            repo = %self.identity.repository(),
            object = %event.involved_object.name,
        )
    )]
    async fn post(&self, event: &LifecycleEvent) -> Result<(), ReportError> {
        let revision = revision_from(event)?;
        let state = to_status_state(event)?;
        let (context, description) = format_name_and_description(event);
        let status = StatusInput::new(state, context, description);

        let owner = self.identity.owner();
        let repository = self.identity.repository();

        let existing = self
            .api
            .list_statuses(
                owner,
                repository,
                &revision,
                ListOptions::first_page(STATUS_PAGE_SIZE),
            )
            .await
            .map_err(|source| ReportError::ListStatuses { source })?;

        if is_duplicate(&existing, &status) {
            self.observer
                .duplicate_skipped(&self.identity, &revision, &status);
            return Ok(());
        }

        self.observer
            .create_started(&self.identity, &revision, &status);
        match self
            .api
            .create_status(owner, repository, &revision, &status)
            .await
        {
            Ok(record) => {
                self.observer.created(&self.identity, &revision, &record);
                Ok(())
            }
            Err(error) => {
                self.observer
                    .create_failed(&self.identity, &revision, &status, &error);
                Err(ReportError::Remote(error))
            }
        }
    }
}

#[async_trait]
impl<A: CommitStatusApi> Notifier for StatusReporter<A> {
    async fn report(&self, event: &LifecycleEvent) -> Result<(), ReportError> {
        self.post(event).await
    }
}

impl<A> std::fmt::Debug for StatusReporter<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Extracts and validates the revision carried by `event`.
pub fn revision_from(event: &LifecycleEvent) -> Result<Revision, ReportError> {
    let raw = event
        .metadata_value(REVISION_METADATA_KEY)
        .ok_or(ReportError::MissingRevision)?;
    Revision::parse(raw).ok_or_else(|| ReportError::InvalidRevision {
        revision: raw.to_string(),
    })
}

/// Returns `true` if the newest comparable record with the same context as
/// `status` also has the same state and description.
///
/// Records are scanned in the given order; the first context match decides.
/// Records missing a context, state, or description are ignored. A record
/// with a state outside [`crate::StatusState`] still decides for its context
/// and never counts as a duplicate.
pub fn is_duplicate(records: &[StatusRecord], status: &StatusInput) -> bool {
    records
        .iter()
        .filter(|r| r.is_comparable())
        .find(|r| r.context == status.context)
        .is_some_and(|r| {
            r.state == Some(RemoteState::Known(status.state)) && r.description == status.description
        })
}
