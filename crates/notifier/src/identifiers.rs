//! Newtype identifiers for the repository being reported against.
//!
//! Each identity concept is a distinct newtype so that an [`Owner`] cannot be
//! passed where a [`RepositoryName`] is expected, and so that a [`Revision`]
//! is known to be a well-formed commit hash once constructed.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for single-path-segment newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! segment_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty
            /// or contains a `/`.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() || v.contains('/') { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

segment_id! {
    /// The user or organisation that owns a repository on the hosting service.
    Owner
}

segment_id! {
    /// The name of a repository within its [`Owner`].
    RepositoryName
}

// ---------------------------------------------------------------------------
// Revision
// ---------------------------------------------------------------------------

/// Hash algorithm a [`Revision`] was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 40 hex characters.
    Sha1,
    /// 64 hex characters.
    Sha256,
}

impl HashAlgorithm {
    fn hex_len(self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }

    fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// A commit hash extracted from event metadata (lowercase hex).
///
/// Accepted input forms:
///
/// | Form | Example |
/// |------|---------|
/// | `<ref>@<algo>:<hash>` | `main@sha1:4f0c…` |
/// | `<algo>:<hash>` | `sha256:9a3e…` |
/// | `<ref>/<hash>` (legacy) | `main/4f0c…` |
/// | `<hash>` | `4f0c…` |
///
/// The hash must be 40 (SHA-1) or 64 (SHA-256) hex characters; when an
/// algorithm prefix is present the length must match it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision {
    hash: String,
    algorithm: HashAlgorithm,
}

impl Revision {
    /// Parses a revision string, returning `None` if it does not contain a
    /// recognised commit hash.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let digest = match value.rsplit_once('@') {
            Some((_, digest)) => digest,
            None => value,
        };

        let (declared, hash) = match digest.split_once(':') {
            Some(("sha1", hash)) => (Some(HashAlgorithm::Sha1), hash),
            Some(("sha256", hash)) => (Some(HashAlgorithm::Sha256), hash),
            Some(_) => return None,
            None => {
                let hash = digest.rsplit('/').next().unwrap_or(digest);
                (None, hash)
            }
        };

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let algorithm = HashAlgorithm::from_hex_len(hash.len())?;
        if declared.is_some_and(|d| d.hex_len() != hash.len()) {
            return None;
        }

        Some(Self {
            hash: hash.to_ascii_lowercase(),
            algorithm,
        })
    }

    /// Returns the bare hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Returns the algorithm inferred from the hash length.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}
