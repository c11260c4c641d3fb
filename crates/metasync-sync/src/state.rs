//! Safe-update state machine
//!
//! One save attempt moves through a fixed sequence of states; each
//! network step has named success and failure transitions so callers can
//! pattern-match exhaustively instead of unwinding generic exceptions.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};

/// States of one safe-update attempt
///
/// `Completed`, `CompletedWithPendingReview`, and `Failed` are terminal.
/// `CompletedWithPendingReview` is a partial success: the change is
/// durably recorded as an open proposal that the remote would not merge
/// yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncState {
    /// Inputs assembled, nothing sent yet
    Initiated,
    /// Creating the generated working branch off the base branch
    BranchCreating,
    /// Reading the target on the base branch for its current hash
    ContentFetching,
    /// Writing the new content to the working branch
    Committing,
    /// Opening the merge proposal back into the base branch
    ProposalOpening,
    /// Completing the proposal merge
    MergeAttempting,
    /// Change merged into the base branch
    Completed,
    /// Change recorded as an open proposal awaiting manual merge
    CompletedWithPendingReview,
    /// A step failed; partially created remote artifacts are left in place
    Failed,
}

impl SyncState {
    /// Check if the state ends the operation
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CompletedWithPendingReview | Self::Failed
        )
    }
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: SyncState) -> Vec<SyncState> {
    use SyncState::*;
    match from {
        Initiated => vec![BranchCreating],
        BranchCreating => vec![ContentFetching, Failed],
        ContentFetching => vec![Committing, Failed],
        Committing => vec![ProposalOpening, Failed],
        ProposalOpening => vec![MergeAttempting, Failed],
        // Once the proposal exists the change is durably recorded; a
        // blocked merge ends in partial success, never in Failed.
        MergeAttempting => vec![Completed, CompletedWithPendingReview],
        Completed | CompletedWithPendingReview | Failed => vec![],
    }
}

/// Validate a state transition
///
/// # Errors
/// Returns `SyncError::IllegalTransition` when `to` is not reachable
/// from `from`
pub fn validate_transition(from: SyncState, to: SyncState) -> Result<(), SyncError> {
    if allowed_transitions(from).into_iter().any(|s| s == to) {
        Ok(())
    } else {
        Err(SyncError::IllegalTransition { from, to })
    }
}
