//! The fixed, sample-free parsing strategy.

use serde_json::Value;

use super::{display_string, ResponseStrategy};
use crate::defaults;
use crate::error::RestError;

/// Parses success bodies as-is and extracts error messages from the common
/// API error shapes without any sample document.
///
/// The error heuristic tests a fixed priority order and returns on the first
/// match: an `errors` array, a validation-style `errors` object, an `error`
/// string, `error_description`, `message`, `detail`, a bare JSON array, a
/// bare JSON string, the raw body text when it is not JSON, and finally a
/// generic fallback message. It never returns an error and never panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleResponse;

impl ResponseStrategy for SimpleResponse {
    fn extract_success(&self, body: &str) -> Result<Option<Value>, RestError> {
        // Direct structural conversion of the whole body, no unwrapping.
        let value: Value = serde_json::from_str(body)?;
        Ok(Some(value))
    }

    fn parse_errors(&self, body: &str) -> Vec<String> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                if let Some(Value::Array(errors)) = map.get("errors") {
                    return errors.iter().map(display_string).collect();
                }
                if let Some(Value::Object(fields)) = map.get("errors") {
                    // Validation style, e.g. {"Email": ["Required", "Invalid"]}
                    return fields
                        .iter()
                        .flat_map(|(field, messages)| match messages {
                            Value::Array(list) => list
                                .iter()
                                .map(|m| format!("{field}: {}", display_string(m)))
                                .collect(),
                            _ => Vec::new(),
                        })
                        .collect();
                }
                if let Some(Value::String(error)) = map.get("error") {
                    return vec![error.clone()];
                }
                for key in ["error_description", "message", "detail"] {
                    if let Some(value) = map.get(key) {
                        return vec![display_string(value)];
                    }
                }
                vec![defaults::parsing::UNKNOWN_ERROR.to_string()]
            }
            Ok(Value::Array(items)) => items.iter().map(display_string).collect(),
            Ok(Value::String(message)) => vec![message],
            Ok(_) => vec![defaults::parsing::UNKNOWN_ERROR.to_string()],
            Err(_) => {
                if body.trim().is_empty() {
                    vec![defaults::parsing::UNKNOWN_ERROR.to_string()]
                } else {
                    vec![body.to_string()]
                }
            }
        }
    }
}
