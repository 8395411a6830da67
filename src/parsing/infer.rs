//! Schema-inferred parsing strategy.
//!
//! Given one representative sample document and two dotted key paths, deduce
//! at configuration time how to extract the success payload and the error
//! messages from that API's responses. The sample's shape drives the
//! deduction, not its values.

use std::path::Path;

use serde_json::Value;

use super::json_path::{get_path, normalize_path};
use super::{display_string, ResponseStrategy};
use crate::error::RestError;

/// How error messages are laid out at the error path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ErrorShape {
    /// The error path holds an array of plain strings.
    PlainStrings,
    /// The error path holds an array of objects; the named field carries the
    /// message.
    MessageField(String),
}

/// A parsing strategy deduced from a sample document.
///
/// Paths use `>` as the segment delimiter, e.g. `"result>payload>items"`,
/// and support `[index]` steps into arrays. Absence of data at either path
/// in the sample does not fail configuration: a sample may legitimately ship
/// empty or null data, and the shape guess falls back to a `message` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredLayout {
    success_path: String,
    error_path: String,
    error_shape: ErrorShape,
}

impl InferredLayout {
    /// Deduce a layout from a sample JSON file on disk.
    ///
    /// A missing file is a fatal configuration error; a file that does not
    /// parse as JSON is a parse error.
    pub fn from_sample_file(
        path: impl AsRef<Path>,
        success_path: &str,
        error_path: &str,
    ) -> Result<Self, RestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RestError::Configuration(format!(
                "sample JSON file not found at {}: {e}",
                path.display()
            ))
        })?;
        let sample: Value = serde_json::from_str(&text).map_err(|e| {
            RestError::Parse(format!("sample JSON file {} is invalid: {e}", path.display()))
        })?;
        Ok(Self::from_sample(&sample, success_path, error_path))
    }

    /// Deduce a layout from an in-memory sample document.
    pub fn from_sample(sample: &Value, success_path: &str, error_path: &str) -> Self {
        let success_path = normalize_path(success_path);
        let error_path = normalize_path(error_path);
        let error_shape = deduce_error_shape(sample, &error_path);
        Self {
            success_path,
            error_path,
            error_shape,
        }
    }
}

fn deduce_error_shape(sample: &Value, error_path: &str) -> ErrorShape {
    match get_path(sample, error_path) {
        Some(Value::Array(arr)) if matches!(arr.first(), Some(Value::String(_))) => {
            ErrorShape::PlainStrings
        }
        Some(Value::Array(arr)) => {
            let field = arr
                .first()
                .and_then(Value::as_object)
                .and_then(|obj| {
                    ["message", "error", "msg"]
                        .into_iter()
                        .find(|key| obj.contains_key(*key))
                })
                .unwrap_or("message");
            ErrorShape::MessageField(field.to_string())
        }
        // No usable first element in the sample: keep the default guess.
        _ => ErrorShape::MessageField("message".to_string()),
    }
}

impl ResponseStrategy for InferredLayout {
    fn extract_success(&self, body: &str) -> Result<Option<Value>, RestError> {
        let root: Value = serde_json::from_str(body)?;
        Ok(match get_path(&root, &self.success_path) {
            None | Some(Value::Null) => None,
            Some(subtree) => Some(subtree.clone()),
        })
    }

    fn parse_errors(&self, body: &str) -> Vec<String> {
        let Ok(root) = serde_json::from_str::<Value>(body) else {
            return Vec::new();
        };
        match (get_path(&root, &self.error_path), &self.error_shape) {
            (Some(Value::Array(items)), ErrorShape::PlainStrings) => {
                items.iter().map(display_string).collect()
            }
            (Some(Value::Array(items)), ErrorShape::MessageField(field)) => items
                .iter()
                .filter_map(|item| item.get(field))
                .map(display_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}
