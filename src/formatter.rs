//! Builders for envelope-shaped JSON bodies.
//!
//! Services that want their replies understood by this layer's default
//! extraction can build them here; the crate's own tests use these to shape
//! mock responses.

use serde::Serialize;
use serde_json::{json, Value};

/// `{"data": <payload>}` — the success convention the named-key extraction
/// unwraps.
pub fn success_json<T: Serialize>(data: T) -> Value {
    json!({ "data": data })
}

/// `{}` — a success reply without a payload.
pub fn empty_success_json() -> Value {
    json!({})
}

/// `{"errors": [{"message": <error>}]}` — the error convention the default
/// error extraction understands.
pub fn errors_json(error: &str) -> Value {
    json!({ "errors": [{ "message": error }] })
}

/// `{"data": <payload>, "description": <text>}` — informational replies.
pub fn info_json<T: Serialize>(data: T, description: &str) -> Value {
    json!({ "data": data, "description": description })
}
