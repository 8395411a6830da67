//! Request options and the option-merge model.
//!
//! A `RequestOptions` bag is configured once and thereafter only read; the
//! capabilities behind it are shared through `Arc`, so cloning an instance
//! is cheap. Per-request options are merged against a client's global
//! options before use, with the request level taking precedence.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::auth::{TokenProvider, TokenSink, UrlProvider};
use crate::defaults;
use crate::error::RestError;
use crate::parsing::{InferredLayout, ResponseStrategy, SimpleResponse};

/// Knobs of the token refresh sub-flow.
///
/// These are per-instance settings and are not filled in by merging; the
/// defaults cover the common refresh endpoint convention.
#[derive(Clone)]
pub struct RefreshOptions {
    /// Field carrying the current access token in the refresh request body.
    pub access_token_field: String,
    /// Field carrying the refresh token, when `refresh_token` is configured.
    pub refresh_token_field: String,
    /// Optional second credential included in the refresh request body.
    pub refresh_token: Option<Arc<dyn TokenProvider>>,
    /// Key in the refresh reply whose value is handed to the token sink.
    pub token_key: String,
    /// Refresh-and-resend rounds allowed per call. Past the budget a 401 is
    /// classified like any other response instead of looping.
    pub max_attempts: u32,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            access_token_field: defaults::refresh::ACCESS_TOKEN_FIELD.to_string(),
            refresh_token_field: defaults::refresh::REFRESH_TOKEN_FIELD.to_string(),
            refresh_token: None,
            token_key: defaults::refresh::TOKEN_KEY.to_string(),
            max_attempts: defaults::refresh::MAX_ATTEMPTS,
        }
    }
}

/// Configuration bag for a logical client or a single request.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub(crate) token: Option<Arc<dyn TokenProvider>>,
    pub(crate) base_url: Option<Arc<dyn UrlProvider>>,
    pub(crate) refresh_endpoint: Option<Arc<dyn UrlProvider>>,
    pub(crate) token_sink: Option<Arc<dyn TokenSink>>,
    /// Tri-state: `None` inherits the global value on merge, `Some(_)` is an
    /// explicit decision that merging never changes.
    pub(crate) refresh_on_unauthorized: Option<bool>,
    pub(crate) strategy: Option<Arc<dyn ResponseStrategy>>,
    pub(crate) success_key: Option<String>,
    pub(crate) refresh: RefreshOptions,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token = Some(provider);
        self
    }

    pub fn with_base_url(mut self, provider: Arc<dyn UrlProvider>) -> Self {
        self.base_url = Some(provider);
        self
    }

    pub fn with_refresh_endpoint(mut self, provider: Arc<dyn UrlProvider>) -> Self {
        self.refresh_endpoint = Some(provider);
        self
    }

    pub fn with_token_sink(mut self, sink: Arc<dyn TokenSink>) -> Self {
        self.token_sink = Some(sink);
        self
    }

    pub fn with_refresh_on_unauthorized(mut self, enabled: bool) -> Self {
        self.refresh_on_unauthorized = Some(enabled);
        self
    }

    /// Install a custom parsing strategy. At most one strategy is active per
    /// instance; the last installed wins.
    pub fn with_strategy(mut self, strategy: Arc<dyn ResponseStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Install the fixed sample-free heuristic as the parsing strategy.
    pub fn with_simple_response(self) -> Self {
        self.with_strategy(Arc::new(SimpleResponse))
    }

    /// Deduce the parsing strategy from a sample JSON file and install it.
    pub fn with_response_layout(
        self,
        sample_path: impl AsRef<Path>,
        success_path: &str,
        error_path: &str,
    ) -> Result<Self, RestError> {
        let layout = InferredLayout::from_sample_file(sample_path, success_path, error_path)?;
        Ok(self.with_strategy(Arc::new(layout)))
    }

    /// Key for default success extraction when no strategy is configured.
    pub fn with_success_key(mut self, key: impl Into<String>) -> Self {
        self.success_key = Some(key.into());
        self
    }

    pub fn with_refresh_options(mut self, refresh: RefreshOptions) -> Self {
        self.refresh = refresh;
        self
    }

    pub(crate) fn refresh_enabled(&self) -> bool {
        self.refresh_on_unauthorized.unwrap_or(false)
    }

    pub(crate) fn success_key(&self) -> &str {
        self.success_key
            .as_deref()
            .unwrap_or(defaults::parsing::SUCCESS_KEY)
    }

    /// Fill unset fields from a global instance, request level first.
    ///
    /// A field set at request level is never overwritten. The refresh flag is
    /// tri-state, so an explicit request-level `false` survives a global
    /// `true`; only an unset flag inherits. Refresh sub-options and the
    /// success key travel with the instance they were set on and do not
    /// participate in merging.
    pub fn merged_with(&self, global: &Self) -> Self {
        Self {
            token: self.token.clone().or_else(|| global.token.clone()),
            base_url: self.base_url.clone().or_else(|| global.base_url.clone()),
            refresh_endpoint: self
                .refresh_endpoint
                .clone()
                .or_else(|| global.refresh_endpoint.clone()),
            token_sink: self.token_sink.clone().or_else(|| global.token_sink.clone()),
            refresh_on_unauthorized: self
                .refresh_on_unauthorized
                .or(global.refresh_on_unauthorized),
            strategy: self.strategy.clone().or_else(|| global.strategy.clone()),
            success_key: self
                .success_key
                .clone()
                .or_else(|| global.success_key.clone()),
            refresh: self.refresh.clone(),
        }
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("token", &self.token.is_some())
            .field("base_url", &self.base_url.is_some())
            .field("refresh_endpoint", &self.refresh_endpoint.is_some())
            .field("token_sink", &self.token_sink.is_some())
            .field("refresh_on_unauthorized", &self.refresh_on_unauthorized)
            .field("strategy", &self.strategy.is_some())
            .field("success_key", &self.success_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{StaticToken, StaticUrl};

    fn token(value: &str) -> Arc<dyn TokenProvider> {
        Arc::new(StaticToken::new(value))
    }

    #[test]
    fn absent_fields_are_filled_from_global() {
        let global = RequestOptions::new()
            .with_token(token("global"))
            .with_base_url(Arc::new(StaticUrl::new("https://api.example.com")))
            .with_simple_response();
        let merged = RequestOptions::new().merged_with(&global);
        assert!(merged.token.is_some());
        assert!(merged.base_url.is_some());
        assert!(merged.strategy.is_some());
    }

    #[test]
    fn request_level_fields_are_never_overwritten() {
        let global = RequestOptions::new().with_token(token("global"));
        let request = RequestOptions::new().with_token(token("request"));
        let merged = request.merged_with(&global);
        let resolved =
            tokio_test::block_on(merged.token.as_ref().unwrap().token()).unwrap();
        assert_eq!(resolved, "request");
    }

    #[test]
    fn a_present_strategy_is_never_replaced() {
        let sample = serde_json::json!({"payload": 1, "errors": ["x"]});
        let request = RequestOptions::new()
            .with_strategy(Arc::new(InferredLayout::from_sample(&sample, "payload", "errors")));
        let global = RequestOptions::new().with_simple_response();
        let merged = request.merged_with(&global);
        // The inferred strategy stays active: its error parser is path-based.
        let errors = merged
            .strategy
            .unwrap()
            .parse_errors(r#"{"errors": ["boom"]}"#);
        assert_eq!(errors, vec!["boom"]);
    }

    #[test]
    fn refresh_flag_is_tri_state() {
        let global_on = RequestOptions::new().with_refresh_on_unauthorized(true);
        let global_off = RequestOptions::new().with_refresh_on_unauthorized(false);

        // Unset inherits.
        assert!(RequestOptions::new().merged_with(&global_on).refresh_enabled());
        assert!(!RequestOptions::new().merged_with(&global_off).refresh_enabled());

        // Explicit request-level decisions survive merging in both directions.
        let explicit_off = RequestOptions::new().with_refresh_on_unauthorized(false);
        assert!(!explicit_off.merged_with(&global_on).refresh_enabled());
        let explicit_on = RequestOptions::new().with_refresh_on_unauthorized(true);
        assert!(explicit_on.merged_with(&global_off).refresh_enabled());
    }

    #[test]
    fn unset_flag_on_both_sides_disables_refresh() {
        let merged = RequestOptions::new().merged_with(&RequestOptions::new());
        assert!(!merged.refresh_enabled());
    }

    #[test]
    fn success_key_defaults_and_overrides() {
        assert_eq!(RequestOptions::new().success_key(), "data");
        let options = RequestOptions::new().with_success_key("result");
        assert_eq!(options.success_key(), "result");
        let merged = RequestOptions::new()
            .merged_with(&RequestOptions::new().with_success_key("rows"));
        assert_eq!(merged.success_key(), "rows");
    }
}
