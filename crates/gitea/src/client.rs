//! HTTP client for the Gitea commit-status API (`/api/v1`).

use std::time::Duration;

use async_trait::async_trait;
use notifier::{
    CommitStatusApi, ConfigurationError, ListOptions, Owner, RepositoryName, Revision,
    StatusApiError, StatusInput, StatusRecord,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Certificate, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::wire::{WireCreateStatus, WireStatus};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for [`GiteaClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiteaClientConfig {
    /// Timeout applied to each request, connect through body.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for GiteaClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("commit-notify/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Token-authenticated Gitea API client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct GiteaClient {
    base_url: String,
    http: reqwest::Client,
}

impl GiteaClient {
    /// Builds a client for the Gitea instance at `base_url`.
    ///
    /// `trust_root` is an optional PEM bundle of CA certificates added to the
    /// system roots when verifying the server.
    pub fn new(
        base_url: &str,
        token: &str,
        trust_root: Option<&[u8]>,
        config: &GiteaClientConfig,
    ) -> Result<Self, ConfigurationError> {
        if token.is_empty() {
            return Err(ConfigurationError::EmptyToken);
        }

        let mut auth = HeaderValue::from_str(&format!("token {token}"))
            .map_err(|e| client_build_error(&e))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str());

        if let Some(pem) = trust_root {
            let certs = Certificate::from_pem_bundle(pem).map_err(|e| client_build_error(&e))?;
            if certs.is_empty() {
                return Err(ConfigurationError::ClientBuild {
                    message: "trust root contains no PEM certificates".to_string(),
                });
            }
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http = builder.build().map_err(|e| client_build_error(&e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Base URL of the Gitea instance, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn statuses_url(&self, owner: &Owner, repository: &RepositoryName, revision: &Revision) -> String {
        format!(
            "{}/api/v1/repos/{owner}/{repository}/statuses/{revision}",
            self.base_url
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StatusApiError> {
        let response = request.send().await.map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = body_or_placeholder(response.text().await);
            return Err(StatusApiError::Http {
                status: status.as_u16(),
                body,
                retry_after,
            });
        }

        let body = response.text().await.map_err(|e| transport_error(&e))?;
        serde_json::from_str(&body).map_err(|e| StatusApiError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CommitStatusApi for GiteaClient {
    async fn list_statuses(
        &self,
        owner: &Owner,
        repository: &RepositoryName,
        revision: &Revision,
        options: ListOptions,
    ) -> Result<Vec<StatusRecord>, StatusApiError> {
        let url = self.statuses_url(owner, repository, revision);
        debug!(url = %url, page = options.page, limit = options.page_size, "Listing commit statuses");

        let request = self.http.get(&url).query(&[
            ("page", options.page.to_string()),
            ("limit", options.page_size.to_string()),
        ]);
        let statuses: Vec<WireStatus> = self.send(request).await?;
        Ok(statuses.into_iter().map(StatusRecord::from).collect())
    }

    async fn create_status(
        &self,
        owner: &Owner,
        repository: &RepositoryName,
        revision: &Revision,
        status: &StatusInput,
    ) -> Result<StatusRecord, StatusApiError> {
        let url = self.statuses_url(owner, repository, revision);
        debug!(url = %url, context = %status.context, state = %status.state, "Posting commit status");

        let request = self.http.post(&url).json(&WireCreateStatus::from(status));
        let created: WireStatus = self.send(request).await?;
        Ok(created.into())
    }
}

impl std::fmt::Debug for GiteaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiteaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn client_build_error(error: &dyn std::error::Error) -> ConfigurationError {
    ConfigurationError::ClientBuild {
        message: error_chain(error),
    }
}

fn transport_error(error: &reqwest::Error) -> StatusApiError {
    StatusApiError::Transport {
        message: error_chain(error),
    }
}

// An unreadable error body must not look like an empty one.
fn body_or_placeholder<E: std::error::Error>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {}>", error_chain(&e)))
}

// reqwest keeps the useful detail (connection refused, timed out) in `source()`.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
