//! The safe-update pipeline
//!
//! Executes one [`SyncRequest`] as a strictly sequential pipeline: each
//! step's network round trip completes (successfully or with a terminal
//! failure) before the next begins. The orchestrator holds no shared
//! mutable state across operations; concurrent saves each own their own
//! [`SyncOperation`].

use crate::branch::{generate_branch_name, DEFAULT_BRANCH_PURPOSE};
use crate::error::SyncError;
use crate::operation::{SyncOperation, SyncOutcome, SyncRequest};
use crate::state::SyncState;
use chrono::Utc;
use metasync_remote::{ContentHash, MergeStrategy, ReadOutcome, RemoteError, RemoteStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Purpose prefix for generated branch names
    pub branch_purpose: String,
    /// Strategy used when completing the merge
    pub merge_strategy: MergeStrategy,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different branch purpose prefix
    #[inline]
    #[must_use]
    pub fn with_branch_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.branch_purpose = purpose.into();
        self
    }

    /// With a different merge strategy
    #[inline]
    #[must_use]
    pub fn with_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            branch_purpose: DEFAULT_BRANCH_PURPOSE.to_string(),
            merge_strategy: MergeStrategy::Squash,
        }
    }
}

/// Drives the branch → commit → propose → merge protocol
///
/// The branch-and-propose design lets the acting user commit content with
/// only review-level permission on the base branch, and produces an
/// auditable, revertible unit of change per save. The cost is four to
/// five sequential round trips and the partial
/// [`SyncOutcome::PendingReview`] outcome callers must surface
/// distinctly.
#[derive(Debug)]
pub struct SafeUpdateOrchestrator<S> {
    store: Arc<S>,
    config: SyncConfig,
}

impl<S: RemoteStore> SafeUpdateOrchestrator<S> {
    /// Create an orchestrator with default configuration
    #[inline]
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, SyncConfig::default())
    }

    /// Create an orchestrator with explicit configuration
    #[inline]
    #[must_use]
    pub fn with_config(store: Arc<S>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    /// Execute one save attempt to a terminal state
    ///
    /// No step is retried here; on failure the caller decides whether to
    /// retry the whole operation (a fresh attempt generates a new branch
    /// name and cannot collide with this one) or abandon it. Nothing
    /// partially created on the remote is cleaned up.
    ///
    /// # Errors
    /// - `SyncError::BranchCollision` if the generated name exists
    /// - `SyncError::StaleContent` if the target changed under the write
    /// - `SyncError::Step` for any other step failure
    pub async fn execute(&self, request: SyncRequest) -> Result<SyncOutcome, SyncError> {
        let branch = generate_branch_name(
            &self.config.branch_purpose,
            &request.target_path,
            Utc::now(),
        );
        let mut op = SyncOperation::new(request, branch);
        tracing::info!(
            "Starting safe update {} for {}/{} on {}",
            op.id(),
            op.request().repo,
            op.request().target_path,
            op.branch()
        );

        op.advance(SyncState::BranchCreating)?;
        self.create_working_branch(&mut op).await?;

        op.advance(SyncState::ContentFetching)?;
        let expected_hash = self.fetch_current_hash(&mut op).await?;

        op.advance(SyncState::Committing)?;
        let new_hash = match self
            .store
            .write_file(
                &op.request().repo,
                &op.request().target_path,
                &op.request().content,
                &op.request().commit_message,
                op.branch(),
                expected_hash,
            )
            .await
        {
            Ok(hash) => hash,
            // Impossible by construction in the same request (the hash
            // was just fetched), still reachable when a racing writer
            // lands between fetch and write.
            Err(RemoteError::Stale { path }) => {
                op.advance(SyncState::Failed)?;
                return Err(SyncError::StaleContent { path });
            }
            Err(source) => {
                op.advance(SyncState::Failed)?;
                return Err(SyncError::Step {
                    state: SyncState::Committing,
                    source,
                });
            }
        };

        op.advance(SyncState::ProposalOpening)?;
        let proposal = match self
            .store
            .propose_merge(
                &op.request().repo,
                &op.request().title,
                op.branch(),
                &op.request().base_branch,
                op.request().body.as_deref(),
            )
            .await
        {
            Ok(proposal) => proposal,
            Err(source) => {
                op.advance(SyncState::Failed)?;
                return Err(SyncError::Step {
                    state: SyncState::ProposalOpening,
                    source,
                });
            }
        };
        op.record_proposal(proposal);

        op.advance(SyncState::MergeAttempting)?;
        match self
            .store
            .complete_merge(&op.request().repo, proposal, self.config.merge_strategy)
            .await
        {
            Ok(()) => {
                op.advance(SyncState::Completed)?;
                tracing::info!("Safe update {} merged as {}", op.id(), proposal);
                Ok(SyncOutcome::Completed {
                    proposal,
                    branch: op.branch().to_string(),
                    new_hash,
                })
            }
            // The change is durably recorded as an open proposal either
            // way; a blocked or failed merge is partial success, not
            // failure.
            Err(reason) => {
                op.advance(SyncState::CompletedWithPendingReview)?;
                tracing::warn!(
                    "Merge of {} not completed ({}), proposal left open for review",
                    proposal,
                    reason
                );
                Ok(SyncOutcome::PendingReview {
                    proposal,
                    branch: op.branch().to_string(),
                    new_hash,
                })
            }
        }
    }

    async fn create_working_branch(&self, op: &mut SyncOperation) -> Result<(), SyncError> {
        match self
            .store
            .create_branch(&op.request().repo, op.branch(), &op.request().base_branch)
            .await
        {
            Ok(()) => Ok(()),
            Err(RemoteError::Conflict(_)) => {
                op.advance(SyncState::Failed)?;
                Err(SyncError::BranchCollision {
                    branch: op.branch().to_string(),
                })
            }
            Err(source) => {
                op.advance(SyncState::Failed)?;
                Err(SyncError::Step {
                    state: SyncState::BranchCreating,
                    source,
                })
            }
        }
    }

    /// Read the target on the base branch for its current hash
    ///
    /// The base branch, not the working branch, is the
    /// optimistic-concurrency checkpoint. A missing file is the new-file
    /// case and needs no hash.
    async fn fetch_current_hash(
        &self,
        op: &mut SyncOperation,
    ) -> Result<Option<ContentHash>, SyncError> {
        match self
            .store
            .read_file(
                &op.request().repo,
                &op.request().target_path,
                &op.request().base_branch,
            )
            .await
        {
            Ok(ReadOutcome::File(file)) => Ok(Some(file.content_hash)),
            Ok(ReadOutcome::Binary(binary)) => Ok(Some(binary.content_hash)),
            Ok(ReadOutcome::NotFound) => Ok(None),
            Err(source) => {
                op.advance(SyncState::Failed)?;
                Err(SyncError::Step {
                    state: SyncState::ContentFetching,
                    source,
                })
            }
        }
    }
}
