//! The request pipeline.
//!
//! Every call goes through [`Client::exchange`]: resolve the path against the
//! base URL, add default headers and credentials, execute through the
//! transport, then run the error checker. The decoding operations finish by
//! running the response decoder into the caller's output.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::options::{ClientOption, Settings};
use crate::{
    Auth, Error, ErrorChecker, Headers, HttpClient, HyperTransport, JsonDecoder, Method, Request,
    Requester, Response, ResponseDecoder, Result,
};

const USER_AGENT: &str = "User-Agent";
const CONTENT_TYPE: &str = "Content-Type";

/// HTTP client bound to a base URL.
///
/// `C` is the transport executing requests, `D` the decoder used by the
/// `*_into` operations. The client is immutable once built and can be shared
/// between tasks; clone it to hand out copies that share the transport.
///
/// # Example
///
/// ```ignore
/// use reqkit::prelude::*;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// let client = Client::builder("https://api.example.com/")
///     .bearer_token("s3cr3t")
///     .build();
///
/// let mut user = User::default();
/// let response = client.get_into("users/42", None, &[], &mut user).await?;
/// assert_eq!(response.status(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct Client<C = HyperTransport, D = JsonDecoder> {
    base_url: Arc<str>,
    transport: C,
    decoder: D,
    settings: Settings,
}

impl Client {
    /// Create a client with the default transport and settings.
    ///
    /// The base URL is not validated here; a malformed one surfaces as
    /// [`Error::InvalidUrl`] on the first request.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::builder(base_url).build()
    }

    /// Create a client with the default transport and the given options.
    #[must_use]
    pub fn with_options(
        base_url: impl AsRef<str>,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Self {
        Self::builder(base_url).options(options).build()
    }

    /// Create a client builder.
    #[must_use]
    pub fn builder(base_url: impl AsRef<str>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }
}

impl<C: HttpClient> Client<C> {
    /// Create a client on top of a caller-supplied transport.
    ///
    /// Pass an `Arc<T>` to keep using the transport elsewhere.
    #[must_use]
    pub fn with_transport(
        base_url: impl AsRef<str>,
        transport: C,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Self {
        ClientBuilder::with_transport(base_url, transport)
            .options(options)
            .build()
    }
}

impl<C, D> Client<C, D> {
    /// The base URL, without trailing `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The transport executing requests.
    #[must_use]
    pub const fn transport(&self) -> &C {
        &self.transport
    }

    /// The decoder used by the `*_into` operations.
    #[must_use]
    pub const fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The `User-Agent` sent when the caller does not set one.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.settings.user_agent
    }

    /// The `Content-Type` sent when the caller does not set one.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.settings.content_type.as_deref()
    }

    /// The active authentication mode.
    #[must_use]
    pub const fn auth(&self) -> &Auth {
        &self.settings.auth
    }

    /// Full URL for `path`; a leading `/` is added when missing.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Build the outgoing request.
    ///
    /// Caller headers come first. `User-Agent` and the configured
    /// `Content-Type` are added only where the caller left them out; the
    /// authentication mode then owns `Authorization`.
    fn build_request(
        &self,
        method: Method,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> Result<Request> {
        let url = Url::parse(&self.url_for(path))?;

        let mut builder = Request::builder(method, url)
            .headers(headers.unwrap_or_default())
            .default_header(USER_AGENT, self.settings.user_agent.as_str())
            .maybe_body(body);

        if let Some(content_type) = &self.settings.content_type {
            builder = builder.default_header(CONTENT_TYPE, content_type.as_str());
        }

        self.settings.auth.apply(builder.headers_mut());

        Ok(builder.build())
    }
}

impl<C: HttpClient, D: ResponseDecoder> Client<C, D> {
    /// Build, send and classify one request.
    async fn exchange(
        &self,
        method: Method,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> Result<Response> {
        let request = self.build_request(method, path, headers, body)?;
        debug!(method = %request.method(), path = request.url().path(), "dispatching request");

        let response = self.transport.execute(request.clone()).await?;
        let status = response.status();
        debug!(status, "response received");

        if let Err(err) = self.settings.error_checker.check(&request, &response) {
            debug!(status, error = %err, "response rejected by error checker");
            return Err(err.rejected(response));
        }

        Ok(response)
    }
}

impl<C: HttpClient, D: ResponseDecoder> Requester for Client<C, D> {
    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> Result<Response> {
        self.exchange(method, path, headers, body).await
    }

    async fn request_into<T: DeserializeOwned + Send>(
        &self,
        method: Method,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
        out: &mut T,
    ) -> Result<Response> {
        let response = self.exchange(method, path, headers, body).await?;

        if let Err(err) = self.decoder.decode_into(response.body(), out) {
            debug!(status = response.status(), error = %err, "response body did not decode");
            return Err(Error::decode(response, err));
        }

        Ok(response)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Client`].
///
/// Every setter is a [`ClientOption`] applied in call order; the transport
/// and decoder setters change the client's type.
///
/// # Example
///
/// ```ignore
/// use reqkit::{Client, FormDecoder, HyperTransport};
/// use std::time::Duration;
///
/// let client = Client::builder("https://auth.example.com")
///     .transport(HyperTransport::builder().timeout(Duration::from_secs(5)).build())
///     .decoder(FormDecoder)
///     .basic_auth("client-id", "client-secret")
///     .build();
/// ```
#[derive(Debug)]
pub struct ClientBuilder<C = HyperTransport, D = JsonDecoder> {
    base_url: String,
    transport: C,
    decoder: D,
    settings: Settings,
}

impl ClientBuilder {
    /// Start a builder with the default transport, decoder and settings.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_transport(base_url, HyperTransport::new())
    }
}

impl<C> ClientBuilder<C> {
    /// Start a builder on top of `transport`.
    #[must_use]
    pub fn with_transport(base_url: impl AsRef<str>, transport: C) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            transport,
            decoder: JsonDecoder,
            settings: Settings::default(),
        }
    }
}

impl<C, D> ClientBuilder<C, D> {
    /// Apply a single option.
    #[must_use]
    pub fn option(mut self, option: ClientOption) -> Self {
        self.settings.apply(option);
        self
    }

    /// Apply options in order.
    #[must_use]
    pub fn options(mut self, options: impl IntoIterator<Item = ClientOption>) -> Self {
        for option in options {
            self.settings.apply(option);
        }
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        self.option(ClientOption::user_agent(user_agent))
    }

    /// Send a `Content-Type` header with every request.
    #[must_use]
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.option(ClientOption::content_type(content_type))
    }

    /// Use basic authentication, replacing any other mode.
    #[must_use]
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.option(ClientOption::basic_auth(username, password))
    }

    /// Use bearer token authentication, replacing any other mode.
    #[must_use]
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.option(ClientOption::bearer_token(token))
    }

    /// Send no credentials.
    #[must_use]
    pub fn no_auth(self) -> Self {
        self.option(ClientOption::Auth(Auth::None))
    }

    /// Replace the default error checker.
    #[must_use]
    pub fn error_checker(self, checker: impl ErrorChecker) -> Self {
        self.option(ClientOption::error_checker(checker))
    }

    /// Use another transport.
    #[must_use]
    pub fn transport<C2: HttpClient>(self, transport: C2) -> ClientBuilder<C2, D> {
        ClientBuilder {
            base_url: self.base_url,
            transport,
            decoder: self.decoder,
            settings: self.settings,
        }
    }

    /// Use another response decoder.
    #[must_use]
    pub fn decoder<D2: ResponseDecoder>(self, decoder: D2) -> ClientBuilder<C, D2> {
        ClientBuilder {
            base_url: self.base_url,
            transport: self.transport,
            decoder,
            settings: self.settings,
        }
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client<C, D> {
        Client {
            base_url: Arc::from(self.base_url),
            transport: self.transport,
            decoder: self.decoder,
            settings: self.settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{DEFAULT_USER_AGENT, FormDecoder};

    /// In-memory transport returning a canned response.
    #[derive(Debug, Clone)]
    struct StubTransport {
        status: u16,
        body: &'static str,
        seen: Arc<Mutex<Vec<Request>>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Arc::default(),
            }
        }

        fn requests(&self) -> Vec<Request> {
            self.seen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }

        fn last(&self) -> Request {
            self.requests().pop().expect("a request was sent")
        }
    }

    impl HttpClient for StubTransport {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.seen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(request);
            let mut headers = Headers::new();
            headers.insert("x-stub".to_string(), "1".to_string());
            Ok(Response::new(
                self.status,
                headers,
                Bytes::from_static(self.body.as_bytes()),
            ))
        }
    }

    /// Transport that always fails before a response exists.
    #[derive(Debug, Clone, Copy)]
    struct DownTransport;

    impl HttpClient for DownTransport {
        async fn execute(&self, _request: Request) -> Result<Response> {
            Err(Error::connection("connection refused"))
        }
    }

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct Item {
        id: u64,
        name: String,
    }

    fn client(stub: &StubTransport) -> Client<StubTransport> {
        Client::with_transport("http://api.test/v1/", stub.clone(), [])
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let with_slash = Client::new("http://h/");
        let without = Client::new("http://h");

        assert_eq!(with_slash.base_url(), "http://h");
        assert_eq!(with_slash.url_for("items"), without.url_for("items"));
        assert_eq!(with_slash.url_for("/items"), without.url_for("/items"));
    }

    #[test]
    fn url_for_adds_missing_slash() {
        let client = Client::new("http://h/api");
        assert_eq!(client.url_for("items/1"), "http://h/api/items/1");
        assert_eq!(client.url_for("/items/1"), "http://h/api/items/1");
        assert_eq!(client.url_for(""), "http://h/api/");
    }

    #[test]
    fn defaults_after_construction() {
        let client = Client::new("http://h");
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(client.content_type(), None);
        assert_eq!(client.auth(), &Auth::None);
    }

    #[tokio::test]
    async fn sends_user_agent_and_no_auth_by_default() {
        let stub = StubTransport::new(200, "");
        client(&stub).get("items", None, &[]).await.expect("get");

        let request = stub.last();
        check!(request.method() == &Method::Get);
        check!(request.url().as_str() == "http://api.test/v1/items");
        check!(request.header("User-Agent") == Some(DEFAULT_USER_AGENT));
        check!(request.header("Authorization").is_none());
        check!(request.header("Content-Type").is_none());
        check!(request.body().is_none());
    }

    #[tokio::test]
    async fn caller_headers_keep_precedence_over_defaults() {
        let stub = StubTransport::new(200, "");
        let client = ClientBuilder::with_transport("http://api.test", stub.clone())
            .user_agent("configured/1")
            .content_type("application/json")
            .build();

        let mut headers = Headers::new();
        headers.insert("user-agent".to_string(), "caller/2".to_string());
        headers.insert("X-Request-Id".to_string(), "r-1".to_string());
        client
            .post("/items", Some(headers), Some(Bytes::from_static(b"{}")))
            .await
            .expect("post");

        let request = stub.last();
        check!(request.header("User-Agent") == Some("caller/2"));
        check!(request.header("X-Request-Id") == Some("r-1"));
        check!(request.header("Content-Type") == Some("application/json"));
        check!(request.headers().len() == 3);
    }

    #[tokio::test]
    async fn query_is_encoded_after_normalized_path() {
        let stub = StubTransport::new(200, "");
        client(&stub)
            .get("search", None, &[("a", "1"), ("b", "x y")])
            .await
            .expect("get");

        check!(stub.last().url().as_str() == "http://api.test/v1/search?a=1&b=x+y");
    }

    #[tokio::test]
    async fn last_auth_mode_wins() {
        let stub = StubTransport::new(200, "");
        let client = ClientBuilder::with_transport("http://api.test", stub.clone())
            .basic_auth("user", "pass")
            .bearer_token("tok")
            .build();

        let mut headers = Headers::new();
        headers.insert("authorization".to_string(), "Token old".to_string());
        client.delete("/items/1", Some(headers), None).await.expect("delete");

        let request = stub.last();
        let authorization: Vec<_> = request
            .headers()
            .keys()
            .filter(|name| name.eq_ignore_ascii_case("authorization"))
            .collect();
        check!(authorization.len() == 1);
        check!(request.header("Authorization") == Some("Bearer tok"));

        let client = ClientBuilder::with_transport("http://api.test", stub.clone())
            .bearer_token("tok")
            .basic_auth("user", "pass")
            .build();
        client.put("/items/1", None, None).await.expect("put");
        check!(stub.last().header("Authorization") == Some("Basic dXNlcjpwYXNz"));
    }

    #[tokio::test]
    async fn decodes_into_out_on_success() {
        let stub = StubTransport::new(201, r#"{"id":7,"name":"bolt"}"#);
        let mut item = Item::default();

        let response = client(&stub)
            .post_into("items", None, Some(Bytes::from_static(b"{}")), &mut item)
            .await
            .expect("post");

        let expected = Item {
            id: 7,
            name: "bolt".to_string(),
        };
        check!(response.status() == 201);
        check!(item == expected);
        // The body is still readable after decoding.
        check!(response.body().as_ref() == br#"{"id":7,"name":"bolt"}"#);
    }

    #[tokio::test]
    async fn http_error_skips_decoding_and_keeps_response() {
        let stub = StubTransport::new(404, r#"{"id":1,"name":"ghost"}"#);
        let mut item = Item {
            id: 99,
            name: "untouched".to_string(),
        };

        let result = client(&stub).get_into("items/1", None, &[], &mut item).await;

        let_assert!(Err(Error::Http(err)) = result);
        check!(err.status() == 404);
        check!(err.response().header("x-stub") == Some("1"));
        check!(err.response().body().as_ref() == br#"{"id":1,"name":"ghost"}"#);
        check!(item.id == 99);
        check!(item.name == "untouched");
    }

    #[tokio::test]
    async fn decode_failure_is_distinct_and_keeps_response() {
        let stub = StubTransport::new(200, "{not json");
        let mut item = Item::default();

        let err = client(&stub)
            .patch_into("items/1", None, None, &mut item)
            .await
            .expect_err("decode should fail");

        check!(err.is_decode());
        check!(!err.is_http());
        check!(err.status() == Some(200));
        check!(err.to_string().starts_with("failed decoding response body"));
        check!(err.body().map(Bytes::as_ref) == Some(b"{not json".as_slice()));
        check!(item == Item::default());
    }

    #[tokio::test]
    async fn custom_checker_errors_carry_response() {
        let stub = StubTransport::new(200, r#"{"error":"quota"}"#);
        let client = ClientBuilder::with_transport("http://api.test", stub.clone())
            .error_checker(|_: &Request, res: &Response| {
                if res.body().starts_with(b"{\"error\"") {
                    Err(Error::custom("api reported an error"))
                } else {
                    Ok(())
                }
            })
            .build();

        let err = client
            .get("/items", None, &[])
            .await
            .expect_err("rejected");

        let_assert!(Error::Rejected { response, source } = &err);
        check!(response.status() == 200);
        check!(source.to_string() == "api reported an error");
    }

    #[tokio::test]
    async fn custom_checker_can_accept_error_statuses() {
        let stub = StubTransport::new(404, "");
        let client = ClientBuilder::with_transport("http://api.test", stub.clone())
            .error_checker(|_: &Request, res: &Response| {
                if res.status() == 404 || res.is_success() {
                    Ok(())
                } else {
                    Err(Error::custom("unexpected"))
                }
            })
            .build();

        let response = client.get("/maybe", None, &[]).await.expect("404 accepted");
        check!(response.status() == 404);
    }

    #[tokio::test]
    async fn transport_errors_surface_unchanged() {
        let client = Client::with_transport("http://api.test", DownTransport, []);

        let err = client.get("/", None, &[]).await.expect_err("down");

        check!(err.is_connection());
        check!(err.response().is_none());
    }

    #[tokio::test]
    async fn invalid_base_url_fails_before_transport() {
        let stub = StubTransport::new(200, "");
        let client = Client::with_transport("not a url", stub.clone(), []);

        let err = client.get("/", None, &[]).await.expect_err("invalid url");

        let_assert!(Error::InvalidUrl(_) = err);
        check!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn alternate_decoder() {
        #[derive(Debug, Default, serde::Deserialize)]
        struct Token {
            access_token: String,
        }

        let stub = StubTransport::new(200, "access_token=abc&token_type=bearer");
        let client = ClientBuilder::with_transport("http://auth.test", stub.clone())
            .decoder(FormDecoder)
            .build();

        let mut token = Token::default();
        client
            .post_into("/token", None, None, &mut token)
            .await
            .expect("token");

        check!(token.access_token == "abc");
    }

    #[tokio::test]
    async fn request_accepts_parsed_method() {
        let stub = StubTransport::new(204, "");
        let method: Method = "patch".parse().expect("method");

        client(&stub)
            .request(method, "items/3", None, Some(Bytes::from_static(b"[]")))
            .await
            .expect("patch");

        let request = stub.last();
        check!(request.method() == &Method::Patch);
        check!(request.body().map(Bytes::as_ref) == Some(b"[]".as_slice()));
    }

    #[tokio::test]
    async fn request_sends_extension_method() {
        let stub = StubTransport::new(200, "");
        let method: Method = "PURGE".parse().expect("valid token");

        client(&stub)
            .request(method, "/cache/items", None, None)
            .await
            .expect("purge");

        let request = stub.last();
        check!(request.method().as_str() == "PURGE");
        check!(request.url().as_str() == "http://api.test/v1/cache/items");
        check!(http::Method::from(request.method().clone()).as_str() == "PURGE");
    }

    #[test]
    fn malformed_method_is_invalid_request() {
        let err = "BAD METHOD".parse::<Method>().expect_err("not a token");
        check!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn shared_transport_through_arc() {
        let stub = Arc::new(StubTransport::new(200, "[]"));
        let client = Client::with_transport("http://api.test", Arc::clone(&stub), []);

        let mut ids: Vec<u64> = vec![1];
        client.get_into("ids", None, &[], &mut ids).await.expect("get");

        check!(ids.is_empty());
        check!(stub.requests().len() == 1);
    }
}
