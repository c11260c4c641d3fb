//! MetaSync Safe-Update Orchestrator
//!
//! Persists edited content to the remote store without risking silent
//! overwrite of concurrent edits, and without requiring direct write
//! access to the base branch. One save attempt runs the sequential
//! pipeline branch → commit → propose → merge, modeled as an explicit
//! finite state machine whose every failure mode is a distinct, named
//! outcome.
//!
//! The orchestrator never retries; retry policy belongs to the caller,
//! and timestamp-unique branch names make a fresh retry always safe.
//!
//! # Example
//!
//! ```rust,ignore
//! use metasync_remote::{RemoteClientConfig, RemoteStoreClient, RepoLocator};
//! use metasync_sync::{SafeUpdateOrchestrator, SyncRequest};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RemoteStoreClient::new(RemoteClientConfig::new("token"))?);
//! let orchestrator = SafeUpdateOrchestrator::new(store);
//!
//! let request = SyncRequest::new(
//!     RepoLocator::new("acme", "site"),
//!     "pages/about.seo.json",
//!     "{\n  \"title\": \"About\"\n}",
//! );
//! let outcome = orchestrator.execute(request).await?;
//! # Ok(())
//! # }
//! ```

pub mod branch;
pub mod error;
pub mod operation;
pub mod orchestrator;
pub mod state;

pub use branch::{generate_branch_name, DEFAULT_BRANCH_PURPOSE};
pub use error::SyncError;
pub use operation::{OperationId, SyncOperation, SyncOutcome, SyncRequest};
pub use orchestrator::{SafeUpdateOrchestrator, SyncConfig};
pub use state::{allowed_transitions, validate_transition, SyncState};
