//! Response parsing strategies
//!
//! A [`ResponseStrategy`] is the single coherent parsing capability bound to
//! an options instance: how to pull the success payload out of a body, and
//! how to pull error messages out of one. Exactly one strategy family is
//! active per options instance, either the fixed heuristic
//! ([`SimpleResponse`]), a schema-inferred layout ([`InferredLayout`]), or a
//! caller-supplied implementation.

mod infer;
pub(crate) mod json_path;
mod simple;

pub use infer::InferredLayout;
pub use simple::SimpleResponse;

use serde_json::Value;

use crate::error::RestError;

/// Success and error extraction for one response layout.
pub trait ResponseStrategy: Send + Sync {
    /// Extract the success payload subtree from a raw body.
    ///
    /// Returns `Ok(None)` when the body carries no payload (the configured
    /// location is absent or null). Conversion of the subtree to the
    /// caller's requested type happens in the executor, so a malformed body
    /// surfaces as a parse error rather than a silent `None`.
    fn extract_success(&self, body: &str) -> Result<Option<Value>, RestError>;

    /// Extract error messages from a failure body.
    ///
    /// Total: never fails, the result is stored verbatim in the response
    /// envelope's error list.
    fn parse_errors(&self, body: &str) -> Vec<String>;
}

/// Render a JSON value the way a human reads an error message: strings
/// verbatim, everything else as compact JSON.
pub(crate) fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Default named-key extraction used when no strategy is configured.
///
/// `None` when the key is absent, null, or an empty string; APIs following
/// the envelope convention use an empty value to mean "no payload".
pub(crate) fn named_value<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    match root.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

/// Default extraction for list operations expecting a named array at the
/// document root. Missing key or non-array shapes yield no elements.
pub(crate) fn named_array<'a>(root: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    root.get(key)?.as_array()
}
