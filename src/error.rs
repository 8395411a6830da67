//! Error Handling Module
//!
//! Defines the crate error type and its conversions from common error types.
//!
//! Only configuration problems, transport failures, refresh failures, and
//! malformed success payloads surface as `RestError`. Ordinary API failures
//! (a 400 with an error body, an unexpected 5xx) are reported in-band through
//! [`ResponseEnvelope`](crate::envelope::ResponseEnvelope) so callers can
//! branch on the response classification without catching errors.

use thiserror::Error;

/// Errors raised by the request layer.
#[derive(Error, Debug)]
pub enum RestError {
    /// Invalid or missing configuration: unknown client name, missing sample
    /// schema file, refresh enabled without a token sink, bad header values.
    /// Raised at setup or resolution time, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure (connect, timeout, read). Propagated from the
    /// HTTP collaborator unmodified; the core performs no transport retries.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The token refresh sub-flow failed, or the call stayed unauthorized
    /// after the bounded refresh budget was spent. Carries the message
    /// extracted from the refresh endpoint's reply when one was available.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// A success body (or a sample schema document) did not parse, or did
    /// not convert to the requested type. Never swallowed: silently returning
    /// nothing here would hide a contract violation by the server.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_message() {
        let err = RestError::Configuration("no client named `billing`".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: no client named `billing`"
        );
    }

    #[test]
    fn serde_errors_map_to_parse() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        assert!(matches!(RestError::from(parse_err), RestError::Parse(_)));
    }
}
