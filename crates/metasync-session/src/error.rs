//! Error types for the editor session

use metasync_document::DocumentError;
use metasync_remote::RemoteError;
use metasync_sync::SyncError;

/// Editor session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Document model failure
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Remote store failure outside a sync operation
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Safe-update failure
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// The target path does not exist; callers offer creation instead
    #[error("file not found: {0}")]
    NotFound(String),

    /// The target has no editable text body
    #[error("{path} has no editable text content")]
    Binary {
        /// Path of the binary file
        path: String,
        /// Direct download reference, when the store provides one
        download_url: Option<String>,
    },

    /// Rejected file name for the create-file flow
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    /// An edit or save was attempted with no file open
    #[error("no file is open")]
    NothingOpen,

    /// A field edit was attempted on a raw (non-metadata) file
    #[error("open file is not a structured document")]
    NotStructured,
}

impl SessionError {
    /// Check if a retry affordance should be offered as-is
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote(err) => err.is_retryable(),
            Self::Sync(err) => err.is_retryable(),
            _ => false,
        }
    }
}
