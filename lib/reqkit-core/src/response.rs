//! HTTP response envelope.
//!
//! A [`Response`] owns its fully buffered body. Every accessor hands out a
//! view over the same buffer, so the error checker, the decoder and the caller
//! can each read the complete payload.
//!
//! # Example
//!
//! ```ignore
//! let response = client.get("/health", None, &[]).await?;
//! let health: Health = response.json()?;
//! ```

use std::io::Read;

use bytes::{Buf, Bytes};

use crate::request::{Headers, find_header};

/// A received response: status, headers and the buffered body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: Headers,
    body: B,
}

impl<B> Response<B> {
    /// Assemble a response, typically from a transport.
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Take the body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Split into status, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (u16, Headers, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Status is 3xx.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        matches!(self.status, 300..=399)
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.status, 400..=499)
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.status, 500..=599)
    }
}

impl Response<Bytes> {
    /// A fresh reader over the buffered body, starting at the first byte.
    ///
    /// Readers are independent: draining one leaves the response and any
    /// other reader untouched.
    #[must_use]
    pub fn reader(&self) -> impl Read + Send + 'static {
        self.body.clone().reader()
    }

    /// A cheap handle on the buffered body.
    #[must_use]
    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    /// Decode the body as JSON, independently of the client's decoder.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}
