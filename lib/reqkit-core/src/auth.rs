//! Request authentication.
//!
//! [`Auth`] holds exactly one authentication mode; choosing a new mode
//! replaces the previous one.

use base64::Engine;

use crate::request::{Headers, remove_header};

/// Name of the header carrying credentials.
pub const AUTHORIZATION: &str = "Authorization";

/// Authentication applied to every outgoing request.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// No credentials are sent.
    #[default]
    None,
    /// `Authorization: Basic base64(username:password)`.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// `Authorization: Bearer <token>`.
    ///
    /// Pass the raw token; the `Bearer ` prefix is added when the header is built.
    Bearer(String),
}

impl Auth {
    /// Basic authentication.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token authentication.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// The `Authorization` header value for this mode, if any.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Basic { username, password } => {
                let credentials = format!("{username}:{password}");
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {encoded}"))
            }
            Self::Bearer(token) => Some(format!("Bearer {token}")),
        }
    }

    /// Writes the `Authorization` header, replacing any caller-supplied one.
    ///
    /// [`Auth::None`] leaves `headers` untouched.
    pub fn apply(&self, headers: &mut Headers) {
        if let Some(value) = self.header_value() {
            remove_header(headers, AUTHORIZATION);
            headers.insert(AUTHORIZATION.to_string(), value);
        }
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"***").finish(),
        }
    }
}
