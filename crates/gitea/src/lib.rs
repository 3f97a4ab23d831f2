//! Gitea infrastructure adapter.
//!
//! Implements [`notifier::CommitStatusApi`] over the Gitea REST API and
//! exposes [`GiteaNotifier`], the ready-to-use [`notifier::Notifier`] for a
//! single Gitea repository.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! Authentication, TLS trust configuration, request timeouts, and the JSON
//! wire format are handled here; the [`notifier`] crate never sees them.

pub mod client;
mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use notifier::{
    ConfigurationError, EndpointIdentity, LifecycleEvent, Notifier, Owner, ReportError,
    ReportObserver, RepositoryName, StatusReporter,
};

pub use client::{GiteaClient, GiteaClientConfig, DEFAULT_TIMEOUT};

/// Reports lifecycle events as commit statuses on one Gitea repository.
#[derive(Debug)]
pub struct GiteaNotifier {
    reporter: StatusReporter<GiteaClient>,
}

impl GiteaNotifier {
    /// Creates a notifier for `address` (e.g. `https://gitea.example.com/owner/repo`).
    ///
    /// Fails if `token` is empty, if the address is not a valid
    /// `host/owner/repository` URL, or if `trust_root` is not a PEM bundle.
    pub fn new(
        address: &str,
        token: &str,
        trust_root: Option<&[u8]>,
    ) -> Result<Self, ConfigurationError> {
        Self::with_config(address, token, trust_root, &GiteaClientConfig::default())
    }

    /// Like [`GiteaNotifier::new`] with explicit client settings.
    pub fn with_config(
        address: &str,
        token: &str,
        trust_root: Option<&[u8]>,
        config: &GiteaClientConfig,
    ) -> Result<Self, ConfigurationError> {
        if token.is_empty() {
            return Err(ConfigurationError::EmptyToken);
        }
        let identity = EndpointIdentity::from_address(address)?;
        let client = GiteaClient::new(identity.host_url(), token, trust_root, config)?;
        Ok(Self {
            reporter: StatusReporter::new(identity, client),
        })
    }

    /// Replaces the default `tracing` observer.
    #[must_use]
    pub fn with_observer(self, observer: Arc<dyn ReportObserver>) -> Self {
        Self {
            reporter: self.reporter.with_observer(observer),
        }
    }

    /// Base URL of the Gitea instance.
    pub fn base_url(&self) -> &str {
        self.reporter.identity().host_url()
    }

    /// Repository owner.
    pub fn owner(&self) -> &Owner {
        self.reporter.identity().owner()
    }

    /// Repository name.
    pub fn repository(&self) -> &RepositoryName {
        self.reporter.identity().repository()
    }
}

#[async_trait]
impl Notifier for GiteaNotifier {
    async fn report(&self, event: &LifecycleEvent) -> Result<(), ReportError> {
        self.reporter.report(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gitea_notifier() {
        let g = GiteaNotifier::new("https://try.gitea.io/foo/bar", "foobar", None).unwrap();
        assert_eq!(g.owner().as_str(), "foo");
        assert_eq!(g.repository().as_str(), "bar");
        assert_eq!(g.base_url(), "https://try.gitea.io");
    }

    #[test]
    fn test_extra_path_segment_is_rejected() {
        let err = GiteaNotifier::new("https://try.gitea.io/foo/bar/baz", "foobar", None).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidAddress { .. }));
    }

    #[test]
    fn test_empty_token_is_rejected_before_address() {
        assert_eq!(
            GiteaNotifier::new("https://try.gitea.io/foo/bar", "", None).unwrap_err(),
            ConfigurationError::EmptyToken
        );
        assert_eq!(
            GiteaNotifier::new("not an address", "", None).unwrap_err(),
            ConfigurationError::EmptyToken
        );
    }

    #[test]
    fn test_notifier_is_usable_as_trait_object() {
        let g = GiteaNotifier::new("https://try.gitea.io/foo/bar", "foobar", None).unwrap();
        let boxed: Box<dyn Notifier> = Box::new(g);
        drop(boxed);
    }
}
