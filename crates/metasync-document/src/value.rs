//! Field values for schema-less documents
//!
//! Provides [`FieldValue`], the tagged union over every shape a document
//! field can take. Arbitrary nesting is allowed; the document imposes no
//! schema on its fields.

use crate::document::StructuredDocument;
use serde::{Deserialize, Serialize};

/// A single field value within a structured document
///
/// Untagged so the serialized form is plain JSON rather than an enum
/// wrapper. `Null` is kept as its own variant so documents containing
/// nulls round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON null
    Null,
    /// Boolean field
    Bool(bool),
    /// Numeric field (integer or float, as written)
    Number(serde_json::Number),
    /// String field
    Text(String),
    /// Array field
    List(Vec<FieldValue>),
    /// Nested object field
    Object(StructuredDocument),
}

impl FieldValue {
    /// Numeric value from a float
    ///
    /// Returns `None` for non-finite floats, which have no JSON form.
    #[inline]
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(Self::Number)
    }

    /// Check if value is null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get string content (if text)
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get boolean content (if bool)
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get numeric content as f64 (if number)
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Get list content (if list)
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get nested document (if object)
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&StructuredDocument> {
        match self {
            Self::Object(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(values: Vec<FieldValue>) -> Self {
        Self::List(values)
    }
}

impl From<StructuredDocument> for FieldValue {
    fn from(doc: StructuredDocument) -> Self {
        Self::Object(doc)
    }
}
