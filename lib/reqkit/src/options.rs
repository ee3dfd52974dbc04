//! Client configuration options.
//!
//! Each [`ClientOption`] sets one concern. Options are applied in order, so
//! a later option replaces an earlier one for the same concern; in particular
//! only the last authentication option is active.

use std::sync::Arc;

use reqkit_core::{Auth, DefaultErrorChecker, ErrorChecker};

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("reqkit/", env!("CARGO_PKG_VERSION"));

/// A single configuration change for a [`Client`](crate::Client).
///
/// # Example
///
/// ```ignore
/// use reqkit::{Client, ClientOption};
///
/// let client = Client::with_options(
///     "https://api.example.com/",
///     [
///         ClientOption::user_agent("inventory-sync/2.1"),
///         ClientOption::bearer_token("s3cr3t"),
///     ],
/// );
/// ```
#[derive(Clone)]
pub enum ClientOption {
    /// Value of the `User-Agent` header.
    UserAgent(String),
    /// Value of the `Content-Type` header sent with every request.
    ContentType(String),
    /// Authentication mode, replacing the current one.
    Auth(Auth),
    /// Response classification.
    ErrorChecker(Arc<dyn ErrorChecker>),
}

impl ClientOption {
    /// Set the `User-Agent` header.
    pub fn user_agent(user_agent: impl Into<String>) -> Self {
        Self::UserAgent(user_agent.into())
    }

    /// Send a `Content-Type` header with every request.
    pub fn content_type(content_type: impl Into<String>) -> Self {
        Self::ContentType(content_type.into())
    }

    /// Use basic authentication.
    pub fn basic_auth(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Auth(Auth::basic(username, password))
    }

    /// Use bearer token authentication. Pass the raw token.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::Auth(Auth::bearer(token))
    }

    /// Replace the default error checker.
    pub fn error_checker(checker: impl ErrorChecker) -> Self {
        Self::ErrorChecker(Arc::new(checker))
    }
}

impl std::fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserAgent(value) => f.debug_tuple("UserAgent").field(value).finish(),
            Self::ContentType(value) => f.debug_tuple("ContentType").field(value).finish(),
            Self::Auth(auth) => f.debug_tuple("Auth").field(auth).finish(),
            Self::ErrorChecker(_) => f.write_str("ErrorChecker(..)"),
        }
    }
}

/// Per-client settings shared by every request.
#[derive(Clone)]
pub(crate) struct Settings {
    pub(crate) user_agent: String,
    pub(crate) content_type: Option<String>,
    pub(crate) auth: Auth,
    pub(crate) error_checker: Arc<dyn ErrorChecker>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            content_type: None,
            auth: Auth::None,
            error_checker: Arc::new(DefaultErrorChecker),
        }
    }
}

impl Settings {
    pub(crate) fn apply(&mut self, option: ClientOption) {
        match option {
            ClientOption::UserAgent(user_agent) => self.user_agent = user_agent,
            ClientOption::ContentType(content_type) => self.content_type = Some(content_type),
            ClientOption::Auth(auth) => self.auth = auth,
            ClientOption::ErrorChecker(checker) => self.error_checker = checker,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("user_agent", &self.user_agent)
            .field("content_type", &self.content_type)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
