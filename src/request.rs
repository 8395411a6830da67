//! Per-call request descriptor.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::RestError;
use crate::options::RequestOptions;

/// Describes one logical call: endpoint, query, payload, header overrides,
/// and request-level options. Built per call and discarded after.
#[derive(Debug, Clone, Default)]
pub struct RestRequest {
    /// Endpoint path, joined to the options' base URL when one is configured.
    pub endpoint: String,
    /// Query string appended as `endpoint?query` on GET and DELETE.
    pub query: Option<String>,
    /// JSON payload for the POST operations.
    pub body: Option<Value>,
    /// URL-form-encoded payload for the form POST operation.
    pub form: Vec<(String, String)>,
    /// Header overrides; same-named defaults are replaced, keys compare
    /// case-insensitively on the wire.
    pub headers: HashMap<String, String>,
    /// Request-level options, merged against the client's global options
    /// before use.
    pub options: RequestOptions,
}

impl RestRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach a prebuilt JSON payload.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize any `Serialize` payload into the request body.
    pub fn with_json<T: Serialize>(mut self, payload: &T) -> Result<Self, RestError> {
        self.body = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    pub fn with_form_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}
