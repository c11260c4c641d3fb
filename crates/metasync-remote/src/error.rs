//! Error types for the remote store client
//!
//! HTTP statuses map onto this taxonomy once, at the client boundary:
//! 404 → `NotFound`, 409/422-class → `Conflict`/`Stale`, 401/403 → `Auth`,
//! 5xx and transport failures → `Transient`. Callers pattern-match; the
//! client never retries on its own.

/// Remote store errors
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Target path, branch, or proposal does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A branch of the given name already exists
    #[error("branch already exists: {0}")]
    Conflict(String),

    /// The file changed since its hash was last observed
    #[error("stale content hash for {path}")]
    Stale {
        /// Path whose write was rejected
        path: String,
    },

    /// The remote refuses to complete the merge (required review, conflicts)
    #[error("merge blocked by the remote: {0}")]
    NotMergeable(String),

    /// Expected a file at the path, found a directory
    #[error("{path} is not a file")]
    NotAFile {
        /// Path that resolved to a directory
        path: String,
    },

    /// Credential rejected by the remote
    #[error("authentication rejected (status {status})")]
    Auth {
        /// HTTP status returned
        status: u16,
    },

    /// Network or server failure; safe to retry
    #[error("transient remote failure: {message}")]
    Transient {
        /// HTTP status, when one was received
        status: Option<u16>,
        /// Transport or server message
        message: String,
    },

    /// Unexpected remote response
    #[error("remote api error (status {status}): {message}")]
    Api {
        /// HTTP status returned
        status: u16,
        /// Remote error message, when one was provided
        message: String,
    },

    /// Response body could not be decoded
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Client construction failed
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl RemoteError {
    /// Check if the failure is worth retrying as-is
    ///
    /// Only transient network/server failures qualify; everything else
    /// needs a changed request or user action first.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Check if the failure reports a concurrent modification
    #[inline]
    #[must_use]
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, Self::Stale { .. } | Self::Conflict(_))
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transient {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_is_retryable() {
        let transient = RemoteError::Transient {
            status: Some(503),
            message: "unavailable".into(),
        };
        assert!(transient.is_retryable());
        assert!(!RemoteError::NotFound("x".into()).is_retryable());
        assert!(!RemoteError::Conflict("b".into()).is_retryable());
    }

    #[test]
    fn conflict_classification() {
        assert!(RemoteError::Stale { path: "a.json".into() }.is_concurrency_conflict());
        assert!(RemoteError::Conflict("branch".into()).is_concurrency_conflict());
        assert!(!RemoteError::NotMergeable("review".into()).is_concurrency_conflict());
    }
}
