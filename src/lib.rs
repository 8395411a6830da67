//! restware
//!
//! A configurable REST request layer: wraps outbound HTTP calls with
//! pluggable authentication and token refresh, a uniform response envelope
//! (status, headers, errors, informational payload), and schema-driven
//! extraction of success and error payloads from heterogeneous JSON
//! response shapes.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use restware::prelude::*;
//!
//! let store = MemoryTokenStore::new(session_token);
//! let options = RequestOptions::new()
//!     .with_base_url(Arc::new(StaticUrl::new("https://api.example.com")))
//!     .with_token(store.clone())
//!     .with_token_sink(store)
//!     .with_refresh_endpoint(Arc::new(StaticUrl::new("auth/refresh")))
//!     .with_refresh_on_unauthorized(true);
//! let client = RestClient::new(options)?;
//!
//! let request = RestRequest::new("users").with_query("page=1");
//! let (users, envelope) = client.get_list::<User>(&request).await?;
//! if envelope.is_client_error() {
//!     eprintln!("rejected: {:?}", envelope.errors);
//! }
//! ```
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod defaults;
pub mod envelope;
pub mod error;
pub mod formatter;
pub mod options;
pub mod parsing;
pub mod registry;
pub mod request;

mod http;

pub use error::RestError;

/// Common imports for users of the crate.
pub mod prelude {
    pub use crate::auth::{
        MemoryTokenStore, StaticToken, StaticUrl, TokenProvider, TokenSink, UrlProvider,
    };
    pub use crate::client::RestClient;
    pub use crate::config::HttpConfig;
    pub use crate::envelope::{ResponseEnvelope, ResponseKind};
    pub use crate::error::RestError;
    pub use crate::options::{RefreshOptions, RequestOptions};
    pub use crate::parsing::{InferredLayout, ResponseStrategy, SimpleResponse};
    pub use crate::registry::ClientRegistry;
    pub use crate::request::RestRequest;
}
