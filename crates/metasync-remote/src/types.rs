//! Remote store data types
//!
//! Identifiers and payloads exchanged with the remote content store. The
//! content hash is the store's opaque identifier for a file's current
//! content and doubles as the optimistic-concurrency token.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A repository on the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoLocator {
    /// Account or organization owning the repository
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoLocator {
    /// Create a new locator
    #[inline]
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl Display for RepoLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Opaque identifier of a file's current content
///
/// Minted by the remote store; any write must present the hash it last
/// observed or the store rejects the write as stale. Never interpreted
/// locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap a hash string from the remote store
    #[inline]
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The raw hash string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 7 chars) for display
    #[inline]
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentHash {
    fn from(hash: String) -> Self {
        Self(hash)
    }
}

impl From<&str> for ContentHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_string())
    }
}

/// Identifier of an open merge proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub u64);

impl Display for ProposalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Strategy for completing a merge proposal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Merge commit
    Merge,
    /// Squash into a single commit
    #[default]
    Squash,
    /// Rebase onto the target
    Rebase,
}

impl MergeStrategy {
    /// Wire name of the strategy
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
        }
    }
}

/// A text file read from the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// File name
    pub name: String,
    /// Path within the repository
    pub path: String,
    /// Decoded text content
    pub content: String,
    /// Current content hash
    pub content_hash: ContentHash,
    /// Size in bytes
    pub size: u64,
    /// Direct download reference, when the store provides one
    pub download_url: Option<String>,
    /// Lowercase extension ("json", "md", ...), empty when absent
    pub file_type: String,
}

/// A file whose body is not decodable text
///
/// Surfaced with a download reference instead of decoded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryContent {
    /// File name
    pub name: String,
    /// Path within the repository
    pub path: String,
    /// Current content hash
    pub content_hash: ContentHash,
    /// Size in bytes
    pub size: u64,
    /// Direct download reference, when the store provides one
    pub download_url: Option<String>,
}

/// Result of reading a path from the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A decodable text file
    File(RemoteFile),
    /// A file with no decodable text body
    Binary(BinaryContent),
    /// The path does not exist on the given ref
    NotFound,
}

impl ReadOutcome {
    /// Get the file (if a text file)
    #[inline]
    #[must_use]
    pub fn file(self) -> Option<RemoteFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }
}

/// A file identified for writing
///
/// Carries the content hash observed at read time; fetched fresh before
/// every write, never cached across user-visible time gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileHandle {
    /// Repository holding the file
    pub repo: RepoLocator,
    /// Path within the repository
    pub path: String,
    /// Content hash observed at read time
    pub content_hash: ContentHash,
    /// Line of history being read/written
    pub branch: String,
}
