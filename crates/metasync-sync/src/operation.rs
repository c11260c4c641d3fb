//! Sync operations
//!
//! A [`SyncOperation`] tracks one in-flight safe-update attempt from
//! creation to a terminal state. It is created per save, owns its state
//! independently of any other operation, and is discarded once terminal;
//! it is never persisted.

use crate::error::SyncError;
use crate::state::{validate_transition, SyncState};
use metasync_remote::{ContentHash, ProposalId, RepoLocator};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique sync operation identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId(pub Ulid);

impl OperationId {
    /// Generate new operation ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inputs for one save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Repository holding the target
    pub repo: RepoLocator,
    /// Path of the file to create or update
    pub target_path: String,
    /// Serialized content to persist
    pub content: String,
    /// Commit message for the write
    pub commit_message: String,
    /// Branch the change is based on and proposed back into
    pub base_branch: String,
    /// Title of the merge proposal
    pub title: String,
    /// Body of the merge proposal
    pub body: Option<String>,
}

impl SyncRequest {
    /// Create a request with default message, title, and base branch
    #[inline]
    #[must_use]
    pub fn new(
        repo: RepoLocator,
        target_path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let target_path = target_path.into();
        Self {
            repo,
            commit_message: format!("Update {target_path} via MetaSync"),
            title: format!("Update {target_path}"),
            base_branch: "main".to_string(),
            body: None,
            target_path,
            content: content.into(),
        }
    }

    /// With a different commit message
    #[inline]
    #[must_use]
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// With a different base branch
    #[inline]
    #[must_use]
    pub fn with_base_branch(mut self, branch: impl Into<String>) -> Self {
        self.base_branch = branch.into();
        self
    }

    /// With a different proposal title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// With a proposal body
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// One in-flight safe-update attempt
#[derive(Debug, Clone)]
pub struct SyncOperation {
    id: OperationId,
    request: SyncRequest,
    generated_branch: String,
    state: SyncState,
    proposal: Option<ProposalId>,
}

impl SyncOperation {
    /// Start a new operation in `Initiated`
    #[inline]
    #[must_use]
    pub fn new(request: SyncRequest, generated_branch: String) -> Self {
        Self {
            id: OperationId::new(),
            request,
            generated_branch,
            state: SyncState::Initiated,
            proposal: None,
        }
    }

    /// Operation identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// The request this operation is executing
    #[inline]
    #[must_use]
    pub fn request(&self) -> &SyncRequest {
        &self.request
    }

    /// The generated working branch name
    #[inline]
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.generated_branch
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The opened proposal, once one exists
    #[inline]
    #[must_use]
    pub fn proposal(&self) -> Option<ProposalId> {
        self.proposal
    }

    /// Move to the next state
    ///
    /// # Errors
    /// Returns `SyncError::IllegalTransition` for a move the state
    /// machine does not permit
    pub fn advance(&mut self, to: SyncState) -> Result<(), SyncError> {
        validate_transition(self.state, to)?;
        tracing::debug!("Sync {}: {:?} -> {:?}", self.id, self.state, to);
        self.state = to;
        Ok(())
    }

    /// Record the opened proposal
    #[inline]
    pub fn record_proposal(&mut self, proposal: ProposalId) {
        self.proposal = Some(proposal);
    }
}

/// Terminal result of a successful (or partially successful) operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The change is live on the base branch
    Completed {
        /// The merged proposal
        proposal: ProposalId,
        /// The working branch the change ran on
        branch: String,
        /// Content hash after the write
        new_hash: ContentHash,
    },
    /// The change is durably recorded as an open proposal the remote
    /// would not merge yet; callers surface this as "submitted, awaiting
    /// manual merge", distinct from both success and failure
    PendingReview {
        /// The open proposal
        proposal: ProposalId,
        /// The working branch the change sits on
        branch: String,
        /// Content hash of the committed content
        new_hash: ContentHash,
    },
}

impl SyncOutcome {
    /// The proposal recording this change
    #[inline]
    #[must_use]
    pub fn proposal(&self) -> ProposalId {
        match self {
            Self::Completed { proposal, .. } | Self::PendingReview { proposal, .. } => *proposal,
        }
    }

    /// Check if the change made it onto the base branch
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SyncRequest {
        SyncRequest::new(
            RepoLocator::new("acme", "site"),
            "pages/about.seo.json",
            "{}",
        )
    }

    #[test]
    fn request_defaults() {
        let request = request();
        assert_eq!(
            request.commit_message,
            "Update pages/about.seo.json via MetaSync"
        );
        assert_eq!(request.base_branch, "main");
        assert!(request.body.is_none());
    }

    #[test]
    fn request_builders() {
        let request = request()
            .with_base_branch("trunk")
            .with_commit_message("tweak")
            .with_title("Tweak about page")
            .with_body("routine metadata update");
        assert_eq!(request.base_branch, "trunk");
        assert_eq!(request.commit_message, "tweak");
        assert_eq!(request.title, "Tweak about page");
        assert_eq!(request.body.as_deref(), Some("routine metadata update"));
    }

    #[test]
    fn operation_starts_initiated() {
        let op = SyncOperation::new(request(), "branch".into());
        assert_eq!(op.state(), SyncState::Initiated);
        assert!(op.proposal().is_none());
    }

    #[test]
    fn operation_ids_are_unique() {
        let a = SyncOperation::new(request(), "b1".into());
        let b = SyncOperation::new(request(), "b2".into());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn advance_enforces_machine() {
        let mut op = SyncOperation::new(request(), "branch".into());
        op.advance(SyncState::BranchCreating).unwrap();
        let result = op.advance(SyncState::Completed);
        assert!(matches!(result, Err(SyncError::IllegalTransition { .. })));
        // Failed advance leaves the state untouched
        assert_eq!(op.state(), SyncState::BranchCreating);
    }

    #[test]
    fn outcome_accessors() {
        let outcome = SyncOutcome::PendingReview {
            proposal: ProposalId(7),
            branch: "b".into(),
            new_hash: ContentHash::new("h"),
        };
        assert_eq!(outcome.proposal(), ProposalId(7));
        assert!(!outcome.is_live());
    }
}
