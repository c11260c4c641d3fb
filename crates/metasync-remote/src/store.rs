//! The remote store trait seam
//!
//! The orchestrator and editor session are written against this trait so
//! protocol behavior can be driven through scripted and mock stores in
//! tests, with [`RemoteStoreClient`](crate::client::RemoteStoreClient) as
//! the production implementation.

use crate::error::RemoteError;
use crate::types::{ContentHash, MergeStrategy, ProposalId, ReadOutcome, RepoLocator};
use async_trait::async_trait;

/// Read/write/branch/merge operations against a remote content store
///
/// Each operation is one remote interaction with no internal retries;
/// retry policy belongs to callers.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch a file's text and current content hash on a ref
    ///
    /// Binary bodies surface as [`ReadOutcome::Binary`] with a download
    /// reference, never as decoded text. A missing path is
    /// [`ReadOutcome::NotFound`], not an error (new-file case).
    ///
    /// # Errors
    /// Remote or transport failure other than a missing path
    async fn read_file(
        &self,
        repo: &RepoLocator,
        path: &str,
        reference: &str,
    ) -> Result<ReadOutcome, RemoteError>;

    /// Create a new branch pointing at the current tip of `from_ref`
    ///
    /// # Errors
    /// - `RemoteError::Conflict` if the branch name already exists
    /// - `RemoteError::NotFound` if `from_ref` does not exist
    async fn create_branch(
        &self,
        repo: &RepoLocator,
        new_branch: &str,
        from_ref: &str,
    ) -> Result<(), RemoteError>;

    /// Check whether a branch exists
    ///
    /// # Errors
    /// Remote or transport failure
    async fn branch_exists(&self, repo: &RepoLocator, branch: &str) -> Result<bool, RemoteError>;

    /// Create or update a file on a branch, returning the new content hash
    ///
    /// When `expected_hash` is supplied and no longer matches the remote's
    /// current hash for the path, the write fails `RemoteError::Stale`
    /// rather than overwriting silently.
    ///
    /// # Errors
    /// - `RemoteError::Stale` on a hash mismatch
    /// - `RemoteError::NotFound` if the repository or branch is missing
    async fn write_file(
        &self,
        repo: &RepoLocator,
        path: &str,
        content: &str,
        message: &str,
        branch: &str,
        expected_hash: Option<ContentHash>,
    ) -> Result<ContentHash, RemoteError>;

    /// Open a review request to merge `source_branch` into `target_branch`
    ///
    /// Does not merge.
    ///
    /// # Errors
    /// Remote or transport failure
    async fn propose_merge(
        &self,
        repo: &RepoLocator,
        title: &str,
        source_branch: &str,
        target_branch: &str,
        body: Option<&str>,
    ) -> Result<ProposalId, RemoteError>;

    /// Attempt to merge a previously opened proposal
    ///
    /// # Errors
    /// - `RemoteError::NotMergeable` when blocked by the remote
    ///   (required review, conflicting changes)
    /// - `RemoteError::NotFound` if the proposal does not exist
    async fn complete_merge(
        &self,
        repo: &RepoLocator,
        proposal: ProposalId,
        strategy: MergeStrategy,
    ) -> Result<(), RemoteError>;

    /// Date of the most recent commit touching a path, when available
    ///
    /// # Errors
    /// Remote or transport failure
    async fn last_commit_date(
        &self,
        repo: &RepoLocator,
        path: &str,
    ) -> Result<Option<String>, RemoteError>;
}
