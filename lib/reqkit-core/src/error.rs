//! Error types for reqkit.
//!
//! Errors raised after a response arrived ([`Error::Http`], [`Error::Rejected`]
//! and [`Error::Decode`]) carry that response, so status, headers and body
//! stay inspectable whichever stage failed.

use derive_more::{Display, Error, From};

use crate::Response;

/// Boxed error type accepted from user code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// HTTP Error
// ============================================================================

/// A response whose status fell outside the success range.
#[derive(Debug, Clone, Display, Error)]
#[display("http status {status}")]
pub struct HttpError {
    status: u16,
    #[error(not(source))]
    response: Response,
}

impl HttpError {
    /// Create an HTTP error from the offending response.
    #[must_use]
    pub fn new(response: Response) -> Self {
        Self {
            status: response.status(),
            response,
        }
    }

    /// The status code, duplicated from the response for quick matching.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// The full response, with a readable body.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Consume into the response.
    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for reqkit operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Status outside the success range, as flagged by the default error checker.
    #[display("{_0}")]
    #[from]
    Http(HttpError),

    /// A custom error checker refused the response.
    #[display("response rejected (status {}): {source}", response.status())]
    #[from(skip)]
    Rejected {
        /// The rejected response.
        #[error(not(source))]
        response: Box<Response>,
        /// What the checker reported.
        source: Box<Error>,
    },

    /// The body could not be decoded into the requested output.
    #[display("failed decoding response body: {source}")]
    #[from(skip)]
    Decode {
        /// The response whose body failed to decode.
        #[error(not(source))]
        response: Box<Response>,
        /// The decoder's error.
        source: Box<Error>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// Form URL-encoded deserialization error.
    #[display("form deserialization error: {_0}")]
    #[from(skip)]
    FormDeserialization(#[error(not(source))] String),

    /// Any other error raised by user-supplied hooks.
    #[display("{_0}")]
    #[from(skip)]
    Custom(#[error(not(source))] BoxError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The connection could not be established or broke mid-exchange.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// The TLS handshake or certificate validation failed.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// The request could not be built; nothing was sent.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// A JSON payload did not match the target type at `path`.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error, typically from a custom error checker.
    pub fn custom(error: impl Into<BoxError>) -> Self {
        Self::Custom(error.into())
    }

    /// Attach `response` to an error reported by an error checker.
    ///
    /// Errors that already carry a response are returned unchanged.
    #[must_use]
    pub fn rejected(self, response: Response) -> Self {
        match self {
            Self::Http(_) | Self::Rejected { .. } => self,
            other => Self::Rejected {
                response: Box::new(response),
                source: Box::new(other),
            },
        }
    }

    /// Wrap a decoder failure together with the response it was decoding.
    #[must_use]
    pub fn decode(response: Response, source: Self) -> Self {
        Self::Decode {
            response: Box::new(response),
            source: Box::new(source),
        }
    }

    /// The response attached to this error, if one was received.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Http(err) => Some(err.response()),
            Self::Rejected { response, .. } | Self::Decode { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Consume into the attached response, if any.
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Http(err) => Some(err.into_response()),
            Self::Rejected { response, .. } | Self::Decode { response, .. } => Some(*response),
            _ => None,
        }
    }

    /// Status of the attached response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(err) => Some(err.status()),
            _ => self.response().map(Response::status),
        }
    }

    /// Body of the attached response.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        self.response().map(Response::body)
    }

    /// A status error from the default checker.
    #[must_use]
    pub const fn is_http(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// The response arrived but its body failed to decode.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// The transport gave up waiting for the response.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// No response was received because the connection failed.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// The attached response has a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }

    /// The attached response has a 5xx status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// The attached response is `404 Not Found`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Decode the attached body as JSON, typically an API error payload.
    ///
    /// `None` when no response was received.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct Problem {
    ///     title: String,
    /// }
    ///
    /// if let Err(err) = client.delete("/orders/42", None, None).await {
    ///     match err.decode_body::<Problem>() {
    ///         Some(Ok(problem)) => tracing::warn!(title = problem.title, "order not deleted"),
    ///         _ => return Err(err),
    ///     }
    /// }
    /// ```
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
