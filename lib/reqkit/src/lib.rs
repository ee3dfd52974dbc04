//! Configurable HTTP client bound to a base URL.
//!
//! A [`Client`] resolves paths against its base URL, adds a `User-Agent`,
//! an optional `Content-Type` and credentials to every request, classifies
//! responses with an [`ErrorChecker`] and decodes bodies with a
//! [`ResponseDecoder`]. The verb-specific operations live on the
//! [`Requester`] trait.
//!
//! # Example
//!
//! ```ignore
//! use reqkit::prelude::*;
//!
//! #[derive(Debug, Default, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = Client::builder("https://api.example.com")
//!     .user_agent("user-sync/1.0")
//!     .basic_auth("admin", "s3cr3t")
//!     .build();
//!
//! let mut user = User::default();
//! client.get_into("/users/42", None, &[], &mut user).await?;
//!
//! match client.delete("/users/42", None, None).await {
//!     Ok(_) => {}
//!     Err(err) if err.is_not_found() => {}
//!     Err(err) => return Err(err),
//! }
//! ```

mod client;
mod config;
mod connector;
mod options;
pub mod prelude;
mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{TransportConfig, TransportConfigBuilder};
pub use options::{ClientOption, DEFAULT_USER_AGENT};
pub use transport::{HyperTransport, HyperTransportBuilder};

// Re-export core types
pub use reqkit_core::{
    AUTHORIZATION, Auth, BoxError, ContentType, DefaultErrorChecker, Error, ErrorChecker,
    FormDecoder, Headers, HttpClient, HttpError, JsonDecoder, Method, Request, RequestBuilder,
    Requester, Response, ResponseDecoder, Result, StatusCode, append_query, find_header,
    from_form, from_json, remove_header, to_form, to_json,
};
