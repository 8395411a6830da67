//! HTTP header utilities.
//!
//! Common helpers for building request headers and converting response
//! headers into the envelope's map form.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::error::RestError;

/// Header builder for outbound requests.
#[derive(Debug)]
pub(crate) struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub(crate) fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Set the Accept content type for the call.
    pub(crate) fn with_accept(mut self, content_type: &'static str) -> Self {
        self.headers
            .insert(ACCEPT, HeaderValue::from_static(content_type));
        self
    }

    /// Add Bearer token authorization. Skipped for an empty token.
    pub(crate) fn with_bearer_auth(mut self, token: &str) -> Result<Self, RestError> {
        if token.is_empty() {
            return Ok(self);
        }
        let value = format!("Bearer {token}");
        self.headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&value).map_err(|e| {
                RestError::Configuration(format!("Invalid token format: {e}"))
            })?,
        );
        Ok(self)
    }

    /// Add caller headers, replacing same-named defaults. Header names
    /// compare case-insensitively.
    pub(crate) fn with_custom_headers(
        mut self,
        custom: &HashMap<String, String>,
    ) -> Result<Self, RestError> {
        for (key, value) in custom {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                RestError::Configuration(format!("Invalid header name '{key}': {e}"))
            })?;
            self.headers.insert(
                name,
                HeaderValue::from_str(value).map_err(|e| {
                    RestError::Configuration(format!("Invalid header value '{value}': {e}"))
                })?,
            );
        }
        Ok(self)
    }

    pub(crate) fn build(self) -> HeaderMap {
        self.headers
    }
}

/// Convert a response `HeaderMap` to the envelope's map form: lowercased
/// keys, last write wins, non-UTF-8 values filtered out.
pub(crate) fn headermap_to_hashmap(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|value| (k.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_accept_and_bearer() {
        let headers = HttpHeaderBuilder::new()
            .with_accept("application/json")
            .with_bearer_auth("test-token")
            .unwrap()
            .build();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer test-token");
    }

    #[test]
    fn empty_token_adds_no_authorization_header() {
        let headers = HttpHeaderBuilder::new()
            .with_bearer_auth("")
            .unwrap()
            .build();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn caller_headers_replace_defaults_case_insensitively() {
        let mut custom = HashMap::new();
        custom.insert("Accept".to_string(), "text/plain".to_string());
        let headers = HttpHeaderBuilder::new()
            .with_accept("application/json")
            .with_custom_headers(&custom)
            .unwrap()
            .build();
        assert_eq!(headers.get(ACCEPT).unwrap(), "text/plain");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn invalid_header_names_are_configuration_errors() {
        let mut custom = HashMap::new();
        custom.insert("bad header".to_string(), "v".to_string());
        let err = HttpHeaderBuilder::new()
            .with_custom_headers(&custom)
            .unwrap_err();
        assert!(matches!(err, RestError::Configuration(_)));
    }

    #[test]
    fn response_headers_lowercase_keys() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("X-Request-Id", HeaderValue::from_static("abc"));
        let map = headermap_to_hashmap(&headers);
        assert_eq!(map.get("content-type").map(String::as_str), Some("application/json"));
        assert_eq!(map.get("x-request-id").map(String::as_str), Some("abc"));
    }
}
