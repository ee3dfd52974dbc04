//! Outgoing requests.
//!
//! The client resolves every call into a [`Request`] before handing it to the
//! transport. Transports and error checkers only ever see this type.
//!
//! ```
//! use reqkit_core::{Method, Request};
//!
//! let url = url::Url::parse("https://inventory.example.com/stock").expect("url");
//! let request: Request = Request::builder(Method::Get, url)
//!     .query("warehouse", "north")
//!     .default_header("User-Agent", "stock-check/0.3")
//!     .build();
//!
//! assert_eq!(request.url().query(), Some("warehouse=north"));
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::Method;

/// Header map used by requests and responses.
///
/// Names are stored as given; lookups through [`find_header`] ignore ASCII case.
/// One value per name: response fields received several times are joined by
/// the transport (`Set-Cookie` lines with `\n`, others with `", "`).
pub type Headers = HashMap<String, String>;

/// Looks up a header value by name, ignoring ASCII case.
#[must_use]
pub fn find_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Removes every entry whose name matches `name`, ignoring ASCII case.
pub fn remove_header(headers: &mut Headers, name: &str) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
}

/// A fully resolved request: absolute URL, final headers, optional body.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: Headers,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Start building a request for `url`.
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// The method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute URL, query included.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Headers as they will be sent.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Headers, for transport layers that decorate requests.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Split into method, URL, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, Headers, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Incremental construction of a [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: Headers,
    body: Option<B>,
}

impl<B> RequestBuilder<B> {
    /// A builder with no headers and no body.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any entry with the same name in any case.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        remove_header(&mut self.headers, &name);
        self.headers.insert(name, value.into());
        self
    }

    /// Sets a header unless one with the same name is already present.
    #[must_use]
    pub fn default_header(mut self, name: &str, value: impl Into<String>) -> Self {
        if find_header(&self.headers, name).is_none() {
            self.headers.insert(name.to_string(), value.into());
        }
        self
    }

    /// Set every header in `headers`, each with [`header`](Self::header) semantics.
    ///
    /// Entries are applied in byte order of their names, so when `headers`
    /// spells one name in several cases (`X-Id` and `x-id`) the outcome does
    /// not depend on map iteration order: the last spelling in that order wins.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut entries: Vec<_> = headers.into_iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        for (name, value) in entries {
            self = self.header(name, value);
        }
        self
    }

    /// Append one urlencoded query pair.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Attach a body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets or clears the request body.
    #[must_use]
    pub fn maybe_body(mut self, body: Option<B>) -> Self {
        self.body = body;
        self
    }

    /// Mutable access to the headers collected so far.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Finish the request.
    #[must_use]
    pub fn build(self) -> Request<B> {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl RequestBuilder<Bytes> {
    /// Serialize `value` as the body and mark it `application/json`.
    pub fn json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        Ok(self
            .header("Content-Type", crate::ContentType::Json)
            .body(crate::to_json(value)?))
    }

    /// Serialize `value` as the body and mark it urlencoded.
    pub fn form<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        Ok(self
            .header("Content-Type", crate::ContentType::FormUrlEncoded)
            .body(crate::to_form(value)?))
    }
}

/// Appends URL-encoded query pairs to a path.
///
/// Spaces encode as `+`. A path that already carries a query string is
/// extended with `&`; otherwise a single `?` separates path and query.
///
/// ```
/// use reqkit_core::append_query;
///
/// assert_eq!(append_query("/search", &[("a", "1"), ("b", "x y")]), "/search?a=1&b=x+y");
/// assert_eq!(append_query("/search", &[]), "/search");
/// ```
#[must_use]
pub fn append_query(path: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }

    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };

    format!("{path}{separator}{encoded}")
}
