//! The uniform result wrapper returned by every call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Response triage based solely on status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// 200 through 299.
    Success,
    /// Exactly 400. Other 4xx and all 5xx codes are `Informational`; the
    /// asymmetry is the layer's contract, callers branch on it.
    ClientError,
    /// Everything else, including 404 and 500.
    Informational,
}

impl ResponseKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            400 => Self::ClientError,
            _ => Self::Informational,
        }
    }
}

/// Status, headers, errors, and informational payload for one call.
///
/// Created fresh per call and never reused. Typed success payloads are
/// returned alongside the envelope by the object/list operations, not stored
/// inside it.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    /// HTTP status code of the final attempt.
    pub status: u16,
    /// Response headers, lowercased keys, last write wins per key.
    pub headers: HashMap<String, String>,
    /// Extracted error messages; populated only for [`ResponseKind::ClientError`].
    pub errors: Vec<String>,
    /// Parsed body, verbatim; populated only for [`ResponseKind::Informational`]
    /// when the body is JSON.
    pub info: Option<Value>,
    /// When the response was received.
    pub received_at: DateTime<Utc>,
}

impl ResponseEnvelope {
    pub(crate) fn new(status: u16, headers: HashMap<String, String>) -> Self {
        Self {
            status,
            headers,
            errors: Vec::new(),
            info: None,
            received_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> ResponseKind {
        ResponseKind::from_status(self.status)
    }

    pub fn is_success(&self) -> bool {
        self.kind() == ResponseKind::Success
    }

    pub fn is_client_error(&self) -> bool {
        self.kind() == ResponseKind::ClientError
    }

    pub fn is_informational(&self) -> bool {
        self.kind() == ResponseKind::Informational
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
