//! Display classification for document fields
//!
//! [`FieldKind`] picks the editing affordance for a field value. The
//! classification is purely presentational; it never changes the value.

use crate::value::FieldValue;

/// String length above which a text field is edited as long text
pub const LONG_TEXT_THRESHOLD: usize = 50;

/// Separator used when a list field is rendered and edited as plain text
pub const LIST_SEPARATOR: &str = ", ";

/// Editing affordance for a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single-line text input
    Text,
    /// Multi-line text area (strings over [`LONG_TEXT_THRESHOLD`] chars)
    LongText,
    /// Numeric input
    Number,
    /// Checkbox
    Boolean,
    /// Comma-joined text area
    List,
    /// Recursive sub-editor
    Nested,
}

impl FieldKind {
    /// Classify a field value
    ///
    /// Nulls classify as `Text` so an empty input is offered.
    #[must_use]
    pub fn infer(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(s) if s.chars().count() > LONG_TEXT_THRESHOLD => Self::LongText,
            FieldValue::Text(_) | FieldValue::Null => Self::Text,
            FieldValue::Number(_) => Self::Number,
            FieldValue::Bool(_) => Self::Boolean,
            FieldValue::List(_) => Self::List,
            FieldValue::Object(_) => Self::Nested,
        }
    }
}

/// Render a list field as editable text
///
/// Elements are joined with `", "`. Scalars render as their plain text;
/// nested lists and objects render as compact JSON.
#[must_use]
pub fn list_to_text(values: &[FieldValue]) -> String {
    values
        .iter()
        .map(element_text)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Parse edited text back into a list field
///
/// Splits on `", "` and drops empty segments. Every element comes back as
/// text. Lossy for elements that legitimately contain a literal
/// comma-space sequence; known limitation of the text affordance, kept for
/// compatibility with content written through it.
#[must_use]
pub fn text_to_list(text: &str) -> Vec<FieldValue> {
    text.split(LIST_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(FieldValue::from)
        .collect()
}

fn element_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Null => String::new(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Number(n) => n.to_string(),
        // No plain-text form; fall back to compact JSON
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
