//! Error types for the document model
//!
//! The model never rejects unknown-shaped input beyond the root-type
//! check; any field shape is accepted.

/// Document model errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Text is not valid JSON, or encoding failed
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but the root is an array or scalar
    #[error("document root must be a json object")]
    NonObjectRoot,

    /// Root path used as a mutation target
    #[error("field path is empty")]
    EmptyPath,
}

impl DocumentError {
    /// Check if the failure is the recoverable parse class
    ///
    /// Parse failures are recovered by falling back to an empty document
    /// with a warning; mutation misuse is not.
    #[inline]
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Json(_) | Self::NonObjectRoot)
    }
}
