//! Schema-less structured documents
//!
//! [`StructuredDocument`] is an insertion-ordered map from field name to
//! [`FieldValue`], parsed from and serialized to pretty-printed JSON text.
//! Keys are unique at every nesting level; insertion order is preserved
//! for display and carries no semantic meaning.

use crate::error::DocumentError;
use crate::path::FieldPath;
use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An editable, schema-less document
///
/// Created by parsing remote text content; the root must be a JSON object
/// (array and scalar roots are rejected). Mutated field-by-field through
/// path-addressed operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredDocument {
    fields: IndexMap<String, FieldValue>,
}

impl StructuredDocument {
    /// Create an empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse document text
    ///
    /// # Errors
    /// - `DocumentError::Json` if the text is not valid JSON
    /// - `DocumentError::NonObjectRoot` if the root is an array or scalar
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(DocumentError::NonObjectRoot);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to pretty-printed JSON (2-space indent, keys in insertion order)
    ///
    /// Round-trips losslessly with [`parse`](Self::parse) for any document
    /// built through [`set`](Self::set) and [`remove`](Self::remove).
    ///
    /// # Errors
    /// Returns `DocumentError::Json` if encoding fails
    pub fn serialize(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of top-level fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if document has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterator over top-level keys in insertion order
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Iterator over top-level entries in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get a top-level field by key
    #[inline]
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Insert or overwrite a top-level field
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    /// Look up a field by path
    ///
    /// Returns `None` when any segment is absent or a non-object value is
    /// hit before the final segment. The root path resolves to `None`.
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&FieldValue> {
        let mut segments = path.iter();
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            match current {
                FieldValue::Object(child) => current = child.fields.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Set a (possibly new) field at a path
    ///
    /// Intermediate objects are created for missing segments; an existing
    /// non-object intermediate is replaced by an object. Intermediate
    /// arrays are never created implicitly.
    ///
    /// # Errors
    /// Returns `DocumentError::EmptyPath` for the root path
    pub fn set(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), DocumentError> {
        if path.is_empty() {
            return Err(DocumentError::EmptyPath);
        }
        self.set_segments(path.segments(), value);
        Ok(())
    }

    fn set_segments(&mut self, segments: &[String], value: FieldValue) {
        // Caller guarantees segments is non-empty.
        if segments.len() == 1 {
            self.fields.insert(segments[0].clone(), value);
            return;
        }
        let slot = self
            .fields
            .entry(segments[0].clone())
            .or_insert_with(|| FieldValue::Object(Self::new()));
        if let FieldValue::Object(child) = slot {
            child.set_segments(&segments[1..], value);
        } else {
            let mut child = Self::new();
            child.set_segments(&segments[1..], value);
            *slot = FieldValue::Object(child);
        }
    }

    /// Remove the field at a path, along with everything nested under it
    ///
    /// Returns the removed value; `None` (no-op) when the path is absent
    /// or empty. Remaining keys keep their insertion order.
    pub fn remove(&mut self, path: &FieldPath) -> Option<FieldValue> {
        self.remove_segments(path.segments())
    }

    fn remove_segments(&mut self, segments: &[String]) -> Option<FieldValue> {
        let (first, rest) = segments.split_first()?;
        if rest.is_empty() {
            return self.fields.shift_remove(first.as_str());
        }
        match self.fields.get_mut(first.as_str())? {
            FieldValue::Object(child) => child.remove_segments(rest),
            _ => None,
        }
    }
}

impl FromIterator<(String, FieldValue)> for StructuredDocument {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
