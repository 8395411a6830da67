//! Request execution.
//!
//! `RestClient` orchestrates one logical call: merge options, send through
//! the transport, run the bounded unauthorized-refresh sub-flow when a 401
//! comes back, classify the response into an envelope, and extract the
//! typed payload for the success path.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{TokenProvider, TokenSink, UrlProvider};
use crate::config::HttpConfig;
use crate::defaults;
use crate::envelope::{ResponseEnvelope, ResponseKind};
use crate::error::RestError;
use crate::http::{headermap_to_hashmap, HttpHeaderBuilder};
use crate::options::RequestOptions;
use crate::parsing::{named_array, named_value, ResponseStrategy, SimpleResponse};
use crate::request::RestRequest;

const LOG_TARGET: &str = "restware::http";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Json,
    Form,
}

/// One logical REST client: a transport, resolved global options, a name
/// for diagnostics. Calls are independent; the client is cheap to share.
#[derive(Debug)]
pub struct RestClient {
    http: reqwest::Client,
    options: RequestOptions,
    name: String,
}

impl RestClient {
    /// Client with the default transport configuration.
    pub fn new(options: RequestOptions) -> Result<Self, RestError> {
        Self::with_config(options, &HttpConfig::default())
    }

    /// Client with an explicit transport configuration.
    pub fn with_config(options: RequestOptions, config: &HttpConfig) -> Result<Self, RestError> {
        Ok(Self {
            http: config.build_client()?,
            options,
            name: crate::registry::DEFAULT_CLIENT.to_string(),
        })
    }

    pub(crate) fn named(
        name: impl Into<String>,
        options: RequestOptions,
        config: &HttpConfig,
    ) -> Result<Self, RestError> {
        Ok(Self {
            http: config.build_client()?,
            options,
            name: name.into(),
        })
    }

    /// POST with a JSON payload; no payload extraction.
    pub async fn post(&self, request: &RestRequest) -> Result<ResponseEnvelope, RestError> {
        let (envelope, _, _) = self.execute(Verb::Post, Encoding::Json, request).await?;
        Ok(envelope)
    }

    /// POST with a JSON payload, extracting a typed object on success.
    pub async fn post_for_object<T: DeserializeOwned>(
        &self,
        request: &RestRequest,
    ) -> Result<(Option<T>, ResponseEnvelope), RestError> {
        let (envelope, options, body) = self.execute(Verb::Post, Encoding::Json, request).await?;
        let data = match &body {
            Some(body) => Self::extract_object(&options, body)?,
            None => None,
        };
        Ok((data, envelope))
    }

    /// POST with a URL-form-encoded payload, extracting a typed object on
    /// success. The Accept header is `multipart/form-data`, matching the
    /// upstream convention for form endpoints.
    pub async fn post_form_for_object<T: DeserializeOwned>(
        &self,
        request: &RestRequest,
    ) -> Result<(Option<T>, ResponseEnvelope), RestError> {
        let (envelope, options, body) = self.execute(Verb::Post, Encoding::Form, request).await?;
        let data = match &body {
            Some(body) => Self::extract_object(&options, body)?,
            None => None,
        };
        Ok((data, envelope))
    }

    /// POST with a JSON payload, extracting a typed list nested under the
    /// success key.
    pub async fn post_for_list<T: DeserializeOwned>(
        &self,
        request: &RestRequest,
    ) -> Result<(Vec<T>, ResponseEnvelope), RestError> {
        let (envelope, options, body) = self.execute(Verb::Post, Encoding::Json, request).await?;
        let data = match &body {
            Some(body) => Self::extract_list(&options, body)?,
            None => Vec::new(),
        };
        Ok((data, envelope))
    }

    /// GET with `endpoint?query`, extracting a typed list from a named
    /// array key at the document root.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        request: &RestRequest,
    ) -> Result<(Vec<T>, ResponseEnvelope), RestError> {
        let (envelope, options, body) = self.execute(Verb::Get, Encoding::Json, request).await?;
        let data = match &body {
            Some(body) => Self::extract_root_list(&options, body)?,
            None => Vec::new(),
        };
        Ok((data, envelope))
    }

    /// GET with `endpoint?query`, extracting a typed object on success.
    pub async fn get_single_item<T: DeserializeOwned>(
        &self,
        request: &RestRequest,
    ) -> Result<(Option<T>, ResponseEnvelope), RestError> {
        let (envelope, options, body) = self.execute(Verb::Get, Encoding::Json, request).await?;
        let data = match &body {
            Some(body) => Self::extract_object(&options, body)?,
            None => None,
        };
        Ok((data, envelope))
    }

    /// GET with `endpoint?query`, returning the untyped extracted value.
    pub async fn get_primitive(
        &self,
        request: &RestRequest,
    ) -> Result<(Option<Value>, ResponseEnvelope), RestError> {
        let (envelope, options, body) = self.execute(Verb::Get, Encoding::Json, request).await?;
        let data = match &body {
            Some(body) => Self::extract_value(&options, body)?,
            None => None,
        };
        Ok((data, envelope))
    }

    /// DELETE with `endpoint?query`; no payload extraction.
    pub async fn delete_item(&self, request: &RestRequest) -> Result<ResponseEnvelope, RestError> {
        let (envelope, _, _) = self.execute(Verb::Delete, Encoding::Json, request).await?;
        Ok(envelope)
    }

    /// Run the request lifecycle: send, bounded refresh-and-resend on 401,
    /// classify. Returns the envelope, the effective options, and the raw
    /// body when the response classified as success.
    async fn execute(
        &self,
        verb: Verb,
        encoding: Encoding,
        request: &RestRequest,
    ) -> Result<(ResponseEnvelope, RequestOptions, Option<String>), RestError> {
        let options = request.options.merged_with(&self.options);
        let with_query = verb != Verb::Post;
        let url = self.resolve_url(&options, request, with_query).await?;

        let mut refresh_attempts = 0u32;
        let response = loop {
            let response = self.send(verb, encoding, &url, &options, request).await?;
            let status = response.status().as_u16();
            if status == 401 && options.refresh_enabled() {
                if refresh_attempts < options.refresh.max_attempts {
                    refresh_attempts += 1;
                    tracing::debug!(
                        target: LOG_TARGET,
                        client = %self.name,
                        url = %url,
                        attempt = refresh_attempts,
                        "unauthorized, refreshing token"
                    );
                    let sink = options.token_sink.as_ref().ok_or_else(|| {
                        RestError::Configuration(
                            "refresh-on-unauthorized is enabled but no token sink is configured"
                                .to_string(),
                        )
                    })?;
                    let credential = self.fetch_refreshed_token(&options).await?;
                    sink.store(credential).await?;
                    continue;
                }
                if refresh_attempts > 0 {
                    // The refreshed credential was rejected as well; failing
                    // here keeps the loop bounded.
                    return Err(RestError::RefreshFailed(
                        "still unauthorized after refresh".to_string(),
                    ));
                }
            }
            break response;
        };

        let status = response.status().as_u16();
        let headers = headermap_to_hashmap(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| RestError::Http(e.to_string()))?;

        let mut envelope = ResponseEnvelope::new(status, headers);
        let success_body = match envelope.kind() {
            ResponseKind::Success => Some(body),
            ResponseKind::ClientError => {
                envelope.errors = Self::error_messages(&options, &body);
                None
            }
            ResponseKind::Informational => {
                envelope.info = serde_json::from_str(&body).ok();
                None
            }
        };
        tracing::debug!(
            target: LOG_TARGET,
            client = %self.name,
            url = %url,
            status,
            kind = ?envelope.kind(),
            "response classified"
        );
        Ok((envelope, options, success_body))
    }

    async fn send(
        &self,
        verb: Verb,
        encoding: Encoding,
        url: &str,
        options: &RequestOptions,
        request: &RestRequest,
    ) -> Result<reqwest::Response, RestError> {
        let headers = self.request_headers(options, request, encoding).await?;
        let mut builder = match verb {
            Verb::Get => self.http.get(url),
            Verb::Post => self.http.post(url),
            Verb::Delete => self.http.delete(url),
        };
        builder = builder.headers(headers);
        builder = match encoding {
            Encoding::Json => match &request.body {
                Some(body) => builder.json(body),
                None => builder,
            },
            Encoding::Form => builder.form(&request.form),
        };
        tracing::debug!(
            target: LOG_TARGET,
            client = %self.name,
            method = verb.as_str(),
            url = %url,
            "sending request"
        );
        builder
            .send()
            .await
            .map_err(|e| RestError::Http(e.to_string()))
    }

    async fn request_headers(
        &self,
        options: &RequestOptions,
        request: &RestRequest,
        encoding: Encoding,
    ) -> Result<HeaderMap, RestError> {
        let accept = match encoding {
            Encoding::Json => "application/json",
            Encoding::Form => "multipart/form-data",
        };
        let token = match &options.token {
            Some(provider) => provider.token().await?,
            None => String::new(),
        };
        Ok(HttpHeaderBuilder::new()
            .with_accept(accept)
            .with_bearer_auth(&token)?
            .with_custom_headers(&request.headers)?
            .build())
    }

    async fn resolve_url(
        &self,
        options: &RequestOptions,
        request: &RestRequest,
        with_query: bool,
    ) -> Result<String, RestError> {
        let base = match &options.base_url {
            Some(provider) => provider.url().await?,
            None => String::new(),
        };
        let mut url = join_url(&base, &request.endpoint);
        if with_query
            && let Some(query) = &request.query
            && !query.is_empty()
        {
            url = format!("{url}?{query}");
        }
        Ok(url)
    }

    /// Exchange the current credential at the refresh endpoint for a new
    /// one. Failure is fatal for the whole call and carries the first error
    /// message extractable from the refresh reply.
    async fn fetch_refreshed_token(&self, options: &RequestOptions) -> Result<Value, RestError> {
        let endpoint = match &options.refresh_endpoint {
            Some(provider) => provider.url().await?,
            None => {
                return Err(RestError::Configuration(
                    "refresh-on-unauthorized is enabled but no refresh endpoint is configured"
                        .to_string(),
                ));
            }
        };
        let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint
        } else {
            let base = match &options.base_url {
                Some(provider) => provider.url().await?,
                None => String::new(),
            };
            join_url(&base, &endpoint)
        };

        let token = match &options.token {
            Some(provider) => provider.token().await?,
            None => String::new(),
        };
        let mut body = serde_json::Map::new();
        body.insert(
            options.refresh.access_token_field.clone(),
            Value::String(token.clone()),
        );
        if let Some(refresh_token) = &options.refresh.refresh_token {
            body.insert(
                options.refresh.refresh_token_field.clone(),
                Value::String(refresh_token.token().await?),
            );
        }

        let headers = HttpHeaderBuilder::new()
            .with_accept("application/json")
            .with_bearer_auth(&token)?
            .build();
        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|e| RestError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RestError::Http(e.to_string()))?;
        if status.is_success() {
            let root: Value = serde_json::from_str(&text)?;
            return named_value(&root, &options.refresh.token_key)
                .cloned()
                .ok_or_else(|| {
                    RestError::RefreshFailed(format!(
                        "refresh reply carries no `{}` value",
                        options.refresh.token_key
                    ))
                });
        }
        let message = Self::error_messages(options, &text)
            .into_iter()
            .next()
            .unwrap_or_else(|| defaults::parsing::UNKNOWN_ERROR.to_string());
        tracing::warn!(
            target: LOG_TARGET,
            client = %self.name,
            url = %url,
            status = status.as_u16(),
            "token refresh failed"
        );
        Err(RestError::RefreshFailed(message))
    }

    fn error_messages(options: &RequestOptions, body: &str) -> Vec<String> {
        match &options.strategy {
            Some(strategy) => strategy.parse_errors(body),
            None => SimpleResponse.parse_errors(body),
        }
    }

    fn extract_value(options: &RequestOptions, body: &str) -> Result<Option<Value>, RestError> {
        match &options.strategy {
            Some(strategy) => strategy.extract_success(body),
            None => {
                let root: Value = serde_json::from_str(body)?;
                Ok(named_value(&root, options.success_key()).cloned())
            }
        }
    }

    fn extract_object<T: DeserializeOwned>(
        options: &RequestOptions,
        body: &str,
    ) -> Result<Option<T>, RestError> {
        match Self::extract_value(options, body)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| RestError::Parse(e.to_string())),
        }
    }

    fn extract_list<T: DeserializeOwned>(
        options: &RequestOptions,
        body: &str,
    ) -> Result<Vec<T>, RestError> {
        match Self::extract_value(options, body)? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| RestError::Parse(e.to_string()))
            }
        }
    }

    /// List extraction for GET: a named array key at the document root. A
    /// missing key or non-array shape yields no elements.
    fn extract_root_list<T: DeserializeOwned>(
        options: &RequestOptions,
        body: &str,
    ) -> Result<Vec<T>, RestError> {
        if options.strategy.is_some() {
            return Self::extract_list(options, body);
        }
        let root: Value = serde_json::from_str(body)?;
        match named_array(&root, options.success_key()) {
            Some(items) => serde_json::from_value(Value::Array(items.clone()))
                .map_err(|e| RestError::Parse(e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    if base.is_empty() {
        endpoint.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}
