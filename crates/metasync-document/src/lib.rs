//! MetaSync Document Model
//!
//! An editable in-memory representation of an arbitrary, schema-less
//! structured JSON document (page metadata of unknown shape):
//! - Parse from and serialize to pretty-printed JSON text
//! - Field get/set/remove by hierarchical path
//! - Per-field display classification for editing affordances
//!
//! The model imposes no schema beyond one rule: the document root must be
//! a JSON object. Any field may be added, removed, or retyped at runtime.
//!
//! # Example
//!
//! ```rust
//! use metasync_document::{FieldPath, FieldValue, StructuredDocument};
//!
//! # fn example() -> Result<(), metasync_document::DocumentError> {
//! let mut doc = StructuredDocument::parse(r#"{"title": "Home"}"#)?;
//! let path: FieldPath = "meta.description".parse().unwrap();
//! doc.set(&path, FieldValue::from("Landing page"))?;
//! let text = doc.serialize()?;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod kind;
pub mod path;
pub mod value;

pub use document::StructuredDocument;
pub use error::DocumentError;
pub use kind::{list_to_text, text_to_list, FieldKind, LIST_SEPARATOR, LONG_TEXT_THRESHOLD};
pub use path::{FieldPath, PathError};
pub use value::FieldValue;
