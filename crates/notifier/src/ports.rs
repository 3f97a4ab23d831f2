//! Port traits implemented by infrastructure crates.
//!
//! [`CommitStatusApi`] is the capability the reporter needs from a hosting
//! service; [`Notifier`] is the capability callers depend on. Both are
//! dyn-compatible via `async_trait`.

use async_trait::async_trait;

use crate::{
    LifecycleEvent, ListOptions, Owner, ReportError, RepositoryName, Revision, StatusApiError,
    StatusInput, StatusRecord,
};

/// Read and write access to the commit statuses of one hosting service.
#[async_trait]
pub trait CommitStatusApi: Send + Sync {
    /// Lists statuses for `revision`, in the order the service returns them
    /// (treated as newest-first). Read-only.
    async fn list_statuses(
        &self,
        owner: &Owner,
        repository: &RepositoryName,
        revision: &Revision,
        options: ListOptions,
    ) -> Result<Vec<StatusRecord>, StatusApiError>;

    /// Creates a new status for `revision` and returns the stored record.
    async fn create_status(
        &self,
        owner: &Owner,
        repository: &RepositoryName,
        revision: &Revision,
        status: &StatusInput,
    ) -> Result<StatusRecord, StatusApiError>;
}

/// Reports lifecycle events to an external system.
///
/// One implementation exists per hosting service; callers depend only on
/// this trait.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Reports one event. Returns `Ok(())` both when a status was written and
    /// when an identical status was already present.
    async fn report(&self, event: &LifecycleEvent) -> Result<(), ReportError>;
}
