//! Default Configuration Values
//!
//! Centralizes the default values used throughout the crate so they are easy
//! to maintain, document, and adjust.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for HTTP requests.
    ///
    /// Set to 3 minutes as an upper bound for slow upstream APIs; timeout
    /// policy belongs to the transport, not the request layer.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

    /// Default connection timeout for establishing HTTP connections.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = "restware/0.1.0";
}

/// Payload extraction defaults
pub mod parsing {
    /// Key under which APIs following the envelope convention nest their
    /// success payload.
    pub const SUCCESS_KEY: &str = "data";

    /// Message returned when no error information could be extracted from a
    /// response body.
    pub const UNKNOWN_ERROR: &str = "Unknown error occurred.";
}

/// Token refresh sub-flow defaults
pub mod refresh {
    /// Field name carrying the current access token in the refresh request
    /// body.
    pub const ACCESS_TOKEN_FIELD: &str = "jwt_token";

    /// Field name carrying the refresh token in the refresh request body,
    /// when a refresh-token provider is configured.
    pub const REFRESH_TOKEN_FIELD: &str = "refresh_token";

    /// Key in the refresh reply whose value is handed to the token sink.
    pub const TOKEN_KEY: &str = "data";

    /// Maximum number of refresh-and-resend rounds for a single call.
    pub const MAX_ATTEMPTS: u32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_defaults() {
        assert_eq!(http::REQUEST_TIMEOUT, Duration::from_secs(180));
        assert!(http::CONNECT_TIMEOUT < http::REQUEST_TIMEOUT);
        assert_eq!(http::USER_AGENT, "restware/0.1.0");
    }

    #[test]
    fn test_refresh_defaults() {
        assert_eq!(refresh::MAX_ATTEMPTS, 1);
        assert_eq!(refresh::TOKEN_KEY, parsing::SUCCESS_KEY);
    }
}
