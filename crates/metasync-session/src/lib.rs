//! MetaSync Editor Session
//!
//! UI-facing state for one open file: loads content through the remote
//! store, holds the parsed document (or raw text for non-metadata
//! files), applies field edits, and dispatches saves to the safe-update
//! orchestrator. Terminal and partial sync outcomes pass through to the
//! caller unchanged for display.
//!
//! A metadata file that fails to parse never crashes the editor: the
//! session falls back to an empty document and records a warning.

pub mod error;
pub mod session;
pub mod validate;

pub use error::SessionError;
pub use session::{EditorContent, EditorSession, OpenFile, SessionConfig};
pub use validate::validate_file_name;
