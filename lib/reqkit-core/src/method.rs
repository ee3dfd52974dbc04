//! Request methods.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Request method understood by the client.
///
/// The common verbs have their own variants; any other valid token (`PURGE`,
/// `PROPFIND`, ...) is carried by [`Method::Other`]. Two methods are equal
/// when their wire tokens are, so `Method::Other(http::Method::GET)` equals
/// `Method::Get`.
#[derive(Debug, Clone)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// Any other method token, sent as is.
    Other(http::Method),
}

const KNOWN: [Method; 7] = [
    Method::Get,
    Method::Post,
    Method::Put,
    Method::Delete,
    Method::Patch,
    Method::Head,
    Method::Options,
];

impl Method {
    /// The method token as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other(method) => method.as_str(),
        }
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    /// Parses a method token.
    ///
    /// The common verbs match ignoring ASCII case. Other tokens are kept
    /// verbatim, since methods are case-sensitive on the wire; a token with
    /// characters outside the HTTP token set is an invalid request.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(known) = KNOWN
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
        {
            return Ok(known);
        }

        http::Method::from_bytes(s.as_bytes())
            .map(Self::Other)
            .map_err(|_| crate::Error::invalid_request(format!("invalid HTTP method: {s:?}")))
    }
}

impl From<http::Method> for Method {
    fn from(method: http::Method) -> Self {
        KNOWN
            .into_iter()
            .find(|known| known.as_str() == method.as_str())
            .unwrap_or(Self::Other(method))
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
            Method::Patch => Self::PATCH,
            Method::Head => Self::HEAD,
            Method::Options => Self::OPTIONS,
            Method::Other(method) => method,
        }
    }
}
