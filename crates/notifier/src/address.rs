//! Parsing of combined "host + repository" addresses.
//!
//! A notifier is configured with a single address such as
//! `https://git.example.com/team/app`. It is split once, at construction time,
//! into an [`EndpointIdentity`]; there is no later re-validation.

use url::Url;

use crate::{ConfigurationError, Owner, RepositoryName};

/// The hosting-service endpoint and repository a notifier reports to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointIdentity {
    host_url: String,
    owner: Owner,
    repository: RepositoryName,
}

impl EndpointIdentity {
    /// Parses `address` into a validated identity.
    pub fn from_address(address: &str) -> Result<Self, ConfigurationError> {
        let (host_url, identifier) = parse_address(address)?;
        let (owner, repository) = split_identifier(&identifier)?;
        Ok(Self {
            host_url,
            owner,
            repository,
        })
    }

    /// Base URL of the hosting service, `scheme://host[:port]` without a
    /// trailing slash.
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// Repository owner.
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Repository name.
    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }
}

/// Splits `address` into `(host_url, "owner/repository")`.
///
/// Supported forms:
///
/// - `http(s)://host[:port]/owner/repo`
/// - `ssh://[user@]host[:port]/owner/repo` (reported against `https://host`)
/// - `user@host:owner/repo` (scp-like, reported against `https://host`)
///
/// A trailing `/` or `.git` suffix is ignored, so clone URLs can be pasted
/// as-is; stricter parsers reject both. The path must consist of exactly two
/// non-empty components, counted on the address as written: `.` and `..`
/// segments are rejected rather than resolved.
pub fn parse_address(address: &str) -> Result<(String, String), ConfigurationError> {
    let invalid = |reason: &str| ConfigurationError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    let normalised = scp_to_ssh(address.trim());
    let url = Url::parse(&normalised).map_err(|e| invalid(&e.to_string()))?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("missing host"))?;
    let host_url = match (url.scheme(), url.port()) {
        ("ssh", _) => format!("https://{host}"),
        (scheme @ ("http" | "https"), Some(port)) => format!("{scheme}://{host}:{port}"),
        (scheme @ ("http" | "https"), None) => format!("{scheme}://{host}"),
        (other, _) => return Err(invalid(&format!("unsupported scheme '{other}'"))),
    };
    Url::parse(&host_url).map_err(|e| invalid(&e.to_string()))?;

    let path = raw_path(&normalised).trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let components: Vec<&str> = path.split('/').collect();
    if components.len() != 2 || components.iter().any(|c| c.is_empty() || is_dot_segment(c)) {
        return Err(invalid("path must be exactly 'owner/repository'"));
    }

    Ok((host_url, path.to_string()))
}

/// Splits an `owner/repository` identifier into its two components.
pub fn split_identifier(
    identifier: &str,
) -> Result<(Owner, RepositoryName), ConfigurationError> {
    let invalid = || ConfigurationError::InvalidIdentifier {
        identifier: identifier.to_string(),
    };

    let mut parts = identifier.split('/');
    let (Some(owner), Some(repository), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let owner = Owner::new(owner).ok_or_else(invalid)?;
    let repository = RepositoryName::new(repository).ok_or_else(invalid)?;
    Ok((owner, repository))
}

// The path exactly as written, before `Url` resolves dot segments.
fn raw_path(address: &str) -> &str {
    let rest = address
        .split_once("://")
        .map_or(address, |(_, rest)| rest);
    let path = rest.find(['/', '?', '#']).map_or("", |i| &rest[i..]);
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn is_dot_segment(component: &str) -> bool {
    matches!(
        component.to_ascii_lowercase().replace("%2e", ".").as_str(),
        "." | ".."
    )
}

// `git@host:owner/repo` has no scheme; rewrite it so `Url` can parse it.
fn scp_to_ssh(address: &str) -> String {
    if address.contains("://") {
        return address.to_string();
    }
    match address.split_once(':') {
        Some((user_host, path)) if user_host.contains('@') && !user_host.contains('/') => {
            format!("ssh://{user_host}/{path}")
        }
        _ => address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_address() {
        let (host, id) = parse_address("https://try.example.io/foo/bar").unwrap();
        assert_eq!(host, "https://try.example.io");
        assert_eq!(id, "foo/bar");
    }

    #[test]
    fn test_parse_keeps_explicit_port() {
        let (host, id) = parse_address("http://localhost:3000/foo/bar").unwrap();
        assert_eq!(host, "http://localhost:3000");
        assert_eq!(id, "foo/bar");
    }

    #[test]
    fn test_parse_strips_git_suffix_and_trailing_slash() {
        assert_eq!(
            parse_address("https://git.example.com/foo/bar.git").unwrap().1,
            "foo/bar"
        );
        assert_eq!(
            parse_address("https://git.example.com/foo/bar/").unwrap().1,
            "foo/bar"
        );
    }

    #[test]
    fn test_parse_ssh_forms_map_to_https() {
        let (host, id) = parse_address("ssh://git@git.example.com:2222/foo/bar.git").unwrap();
        assert_eq!(host, "https://git.example.com");
        assert_eq!(id, "foo/bar");

        let (host, id) = parse_address("git@git.example.com:foo/bar.git").unwrap();
        assert_eq!(host, "https://git.example.com");
        assert_eq!(id, "foo/bar");
    }

    #[test]
    fn test_parse_rejects_extra_path_segment() {
        let err = parse_address("https://try.example.io/foo/bar/baz").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidAddress { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_repository() {
        assert!(parse_address("https://try.example.io/foo").is_err());
        assert!(parse_address("https://try.example.io/").is_err());
        assert!(parse_address("https://try.example.io/foo//bar").is_err());
    }

    #[test]
    fn test_parse_rejects_dot_segments() {
        for address in [
            "https://try.example.io/x/../foo/bar",
            "https://try.example.io/foo/..",
            "https://try.example.io/./foo/bar",
            "https://try.example.io/foo/%2E%2E",
            "git@try.example.io:foo/../bar/baz",
        ] {
            assert!(
                matches!(
                    parse_address(address),
                    Err(ConfigurationError::InvalidAddress { .. })
                ),
                "{address} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_ignores_query_and_fragment() {
        assert_eq!(
            parse_address("https://try.example.io/foo/bar?tab=1#top").unwrap().1,
            "foo/bar"
        );
    }

    #[test]
    fn test_parse_rejects_invalid_host() {
        assert!(parse_address("not a url/foo/bar").is_err());
        assert!(parse_address("https://exa mple.com/foo/bar").is_err());
        assert!(parse_address("ftp://example.com/foo/bar").is_err());
    }

    #[test]
    fn test_split_identifier() {
        let (owner, repo) = split_identifier("foo/bar").unwrap();
        assert_eq!(owner.as_str(), "foo");
        assert_eq!(repo.as_str(), "bar");

        for bad in ["foo", "foo/bar/baz", "/bar", "foo/", ""] {
            assert_eq!(
                split_identifier(bad),
                Err(ConfigurationError::InvalidIdentifier {
                    identifier: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn test_endpoint_identity_from_address() {
        let identity = EndpointIdentity::from_address("https://try.example.io/foo/bar").unwrap();
        assert_eq!(identity.host_url(), "https://try.example.io");
        assert_eq!(identity.owner().as_str(), "foo");
        assert_eq!(identity.repository().as_str(), "bar");
    }
}
