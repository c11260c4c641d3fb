//! MetaSync Remote Store Client
//!
//! A minimal, typed surface over a remote version-controlled content API:
//! - Read file content with its current content hash
//! - Create branches, write files with optimistic concurrency
//! - Open and complete merge proposals
//!
//! Every operation maps remote HTTP statuses to typed outcomes; no retry
//! or branching policy lives here. The [`RemoteStore`] trait is the seam
//! the orchestrator is driven through, with [`RemoteStoreClient`] as the
//! production implementation.

pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use client::{RemoteClientConfig, RemoteStoreClient};
pub use error::RemoteError;
pub use store::RemoteStore;
pub use types::{
    BinaryContent, ContentHash, MergeStrategy, ProposalId, ReadOutcome, RemoteFile,
    RemoteFileHandle, RepoLocator,
};
