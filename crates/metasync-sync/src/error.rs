//! Error types for the safe-update orchestrator
//!
//! Every step failure carries which step failed and which remote error
//! caused it, so callers can decide to retry the whole operation (always
//! safe — branch names are timestamp-unique) or abandon it.

use crate::state::SyncState;
use metasync_remote::RemoteError;

/// Safe-update failures
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The generated branch name already exists
    ///
    /// Not retried with a suffix; a fresh attempt generates a new
    /// timestamp and cannot collide with this one.
    #[error("branch name collision: {branch}")]
    BranchCollision {
        /// The colliding name
        branch: String,
    },

    /// The target changed between the hash fetch and the commit
    #[error("content changed concurrently at {path}")]
    StaleContent {
        /// Path whose write was rejected
        path: String,
    },

    /// A protocol step failed with a remote error
    #[error("{state:?} step failed: {source}")]
    Step {
        /// The step that failed
        state: SyncState,
        /// The remote failure
        #[source]
        source: RemoteError,
    },

    /// A transition not permitted by the state machine was attempted
    #[error("illegal sync transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// State transitioned from
        from: SyncState,
        /// State transitioned to
        to: SyncState,
    },
}

impl SyncError {
    /// Check if a fresh attempt is worth making without user action
    ///
    /// Transient step failures and branch collisions qualify (a retry
    /// runs under a new timestamp). A stale-content failure needs the
    /// user to reconcile with the concurrent edit first.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::BranchCollision { .. } => true,
            Self::Step { source, .. } => source.is_retryable(),
            Self::StaleContent { .. } | Self::IllegalTransition { .. } => false,
        }
    }

    /// The step a failure occurred at, when one applies
    #[inline]
    #[must_use]
    pub fn failed_state(&self) -> Option<SyncState> {
        match self {
            Self::Step { state, .. } => Some(*state),
            Self::BranchCollision { .. } => Some(SyncState::BranchCreating),
            Self::StaleContent { .. } => Some(SyncState::Committing),
            Self::IllegalTransition { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_step_is_retryable() {
        let err = SyncError::Step {
            state: SyncState::ContentFetching,
            source: RemoteError::Transient {
                status: Some(503),
                message: "unavailable".into(),
            },
        };
        assert!(err.is_retryable());
        assert_eq!(err.failed_state(), Some(SyncState::ContentFetching));
    }

    #[test]
    fn stale_content_is_not_retryable() {
        let err = SyncError::StaleContent {
            path: "a.json".into(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.failed_state(), Some(SyncState::Committing));
    }

    #[test]
    fn branch_collision_is_retryable() {
        let err = SyncError::BranchCollision {
            branch: "content-update-x-20240101T000000".into(),
        };
        assert!(err.is_retryable());
    }
}
