//! Named client registry.
//!
//! Maps logical client names to their options, configured once at startup
//! and read thereafter. The registry is an explicit value handed to the
//! code that needs it; there is no process-wide fallback instance.

use std::collections::HashMap;

use crate::client::RestClient;
use crate::config::HttpConfig;
use crate::error::RestError;
use crate::options::RequestOptions;

/// Name resolved by [`ClientRegistry::default_client`] and by empty names.
pub const DEFAULT_CLIENT: &str = "default";

/// Registry of named `RequestOptions`, one entry per name, names compared
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    options: HashMap<String, RequestOptions>,
    http: HttpConfig,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose clients share an explicit transport configuration.
    pub fn with_http_config(http: HttpConfig) -> Self {
        Self {
            options: HashMap::new(),
            http,
        }
    }

    /// Register options under a name. Re-registering a name replaces the
    /// previous entry.
    pub fn register(mut self, name: impl Into<String>, options: RequestOptions) -> Self {
        self.options.insert(normalize_name(&name.into()), options);
        self
    }

    /// Register options under the default name.
    pub fn register_default(self, options: RequestOptions) -> Self {
        self.register(DEFAULT_CLIENT, options)
    }

    /// Resolve a client by name. An unknown name is a fatal configuration
    /// error; an empty name resolves the default entry.
    pub fn client(&self, name: &str) -> Result<RestClient, RestError> {
        let key = normalize_name(name);
        let options = self.options.get(&key).ok_or_else(|| {
            RestError::Configuration(format!("no client configuration registered under `{key}`"))
        })?;
        RestClient::named(key, options.clone(), &self.http)
    }

    pub fn default_client(&self) -> Result<RestClient, RestError> {
        self.client(DEFAULT_CLIENT)
    }
}

fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_CLIENT.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        let registry = ClientRegistry::new().register("Billing", RequestOptions::new());
        assert!(registry.client("billing").is_ok());
        assert!(registry.client("BILLING").is_ok());
    }

    #[test]
    fn unknown_name_is_a_configuration_error() {
        let registry = ClientRegistry::new().register_default(RequestOptions::new());
        let err = registry.client("payments").unwrap_err();
        assert!(matches!(err, RestError::Configuration(_)));
        assert!(err.to_string().contains("payments"));
    }

    #[test]
    fn empty_name_resolves_the_default_entry() {
        let registry = ClientRegistry::new().register_default(RequestOptions::new());
        assert!(registry.client("").is_ok());
        assert!(registry.default_client().is_ok());
    }

    #[test]
    fn re_registering_replaces_the_entry() {
        let registry = ClientRegistry::new()
            .register("api", RequestOptions::new())
            .register("API", RequestOptions::new().with_success_key("rows"));
        // One entry survives, the later registration.
        assert_eq!(registry.options.len(), 1);
        assert_eq!(
            registry.options.get("api").unwrap().success_key(),
            "rows"
        );
    }
}
