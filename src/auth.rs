//! Authentication capabilities and token providers.
//!
//! A small set of named traits replaces ad-hoc callback fields: an options
//! instance is wired from coherent, testable implementations instead of
//! independently settable closures.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::RestError;

/// An asynchronous Bearer token provider.
///
/// Implementations may cache internally or fetch the credential from
/// wherever it lives (session state, a keychain, another service). An empty
/// string means "no credential": the Authorization header is skipped.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the access token placed in the `Authorization: Bearer <token>`
    /// header.
    async fn token(&self) -> Result<String, RestError>;
}

/// Provides a URL-valued configuration item, such as the base URL prefixed
/// to endpoints or the refresh-token endpoint.
#[async_trait]
pub trait UrlProvider: Send + Sync {
    async fn url(&self) -> Result<String, RestError>;
}

/// Receives the credential obtained by the refresh sub-flow.
///
/// The value handed over is whatever the refresh endpoint returned under the
/// configured token key, typically a string. Parallel calls sharing one
/// options instance may race to refresh; both sinks are invoked and the last
/// write wins. Callers needing stronger coordination should serialize
/// refreshes behind their own per-credential lock.
#[async_trait]
pub trait TokenSink: Send + Sync {
    async fn store(&self, credential: serde_json::Value) -> Result<(), RestError>;
}

/// A fixed token, useful for tests and scenarios where the credential is
/// managed externally.
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String, RestError> {
        Ok(self.token.expose_secret().to_string())
    }
}

/// A fixed URL.
pub struct StaticUrl {
    url: String,
}

impl StaticUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl UrlProvider for StaticUrl {
    async fn url(&self) -> Result<String, RestError> {
        Ok(self.url.clone())
    }
}

/// An in-memory credential cell that is both a [`TokenProvider`] and a
/// [`TokenSink`], so a refreshed token is visible to the retried call.
pub struct MemoryTokenStore {
    token: RwLock<SecretString>,
}

impl MemoryTokenStore {
    pub fn new(initial: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            token: RwLock::new(SecretString::from(initial.into())),
        })
    }

    /// Snapshot of the currently held token.
    pub fn current(&self) -> String {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .expose_secret()
            .to_string()
    }
}

#[async_trait]
impl TokenProvider for MemoryTokenStore {
    async fn token(&self) -> Result<String, RestError> {
        Ok(self.current())
    }
}

#[async_trait]
impl TokenSink for MemoryTokenStore {
    async fn store(&self, credential: serde_json::Value) -> Result<(), RestError> {
        let token = match credential {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = SecretString::from(token);
        Ok(())
    }
}
