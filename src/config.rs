//! HTTP transport configuration.
//!
//! Transport-level knobs live here, outside the request core: the core only
//! consumes a ready `reqwest::Client`. Timeout policy in particular is the
//! transport's responsibility, with a conservative default upper bound.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::defaults;
use crate::error::RestError;

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Default headers applied to every request
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
        }
    }
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::new()
    }

    /// Build the shared transport client from this configuration.
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, RestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| RestError::Configuration(format!("Invalid proxy '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }
        if !self.headers.is_empty() {
            let mut default_headers = HeaderMap::new();
            for (key, value) in &self.headers {
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                    RestError::Configuration(format!("Invalid header name '{key}': {e}"))
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    RestError::Configuration(format!("Invalid header value '{value}': {e}"))
                })?;
                default_headers.insert(name, value);
            }
            builder = builder.default_headers(default_headers);
        }
        builder
            .build()
            .map_err(|e| RestError::Configuration(format!("Failed to build HTTP client: {e}")))
    }
}

/// Builder for `HttpConfig`.
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> HttpConfig {
        let base = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout.or(base.timeout),
            connect_timeout: self.connect_timeout.or(base.connect_timeout),
            headers: self.headers,
            proxy: self.proxy,
            user_agent: self.user_agent.or(base.user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_carries_conservative_timeouts() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Some(Duration::from_secs(180)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert!(config.user_agent.is_some());
    }

    #[test]
    fn builder_overrides_and_inherits() {
        let config = HttpConfig::builder()
            .timeout(Duration::from_secs(5))
            .header("X-Env", "test")
            .build();
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.headers.get("X-Env").map(String::as_str), Some("test"));
    }

    #[test]
    fn client_builds_from_defaults() {
        assert!(HttpConfig::default().build_client().is_ok());
    }

    #[test]
    fn invalid_proxy_is_a_configuration_error() {
        let config = HttpConfig::builder().proxy("::not a proxy::").build();
        assert!(matches!(
            config.build_client(),
            Err(RestError::Configuration(_))
        ));
    }
}
