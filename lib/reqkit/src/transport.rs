//! Default HTTP transport using hyper-util.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

use crate::{
    Error, Headers, HttpClient, Request, Response, Result,
    config::{TransportConfig, TransportConfigBuilder},
    connector::https_connector,
};

/// Field lines that cannot be folded with commas; joined with `\n` instead.
const SET_COOKIE: &str = "set-cookie";

/// HTTP transport over the hyper-util pooled client, with rustls for TLS.
///
/// This is the transport a [`Client`](crate::Client) uses unless another one
/// is supplied. Cloning is cheap and clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// use reqkit::HyperTransport;
/// use std::time::Duration;
///
/// let transport = HyperTransport::builder()
///     .timeout(Duration::from_secs(30))
///     .pool_idle_per_host(8)
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport from an explicit configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(&config));

        Self { inner, config }
    }

    /// Create a transport builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// The configuration this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn build_hyper_request(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(body.map_or_else(Full::default, Full::new))
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    /// Flatten response headers into one entry per name.
    ///
    /// Repeated fields are joined with `", "`. `Set-Cookie` values may
    /// themselves contain commas, so they are joined with `\n`.
    fn collect_headers(headers: &http::HeaderMap) -> Headers {
        let mut collected = Headers::with_capacity(headers.keys_len());
        for (name, value) in headers {
            let separator = if name.as_str() == SET_COOKIE { "\n" } else { ", " };
            let value = String::from_utf8_lossy(value.as_bytes());
            collected
                .entry(name.as_str().to_string())
                .and_modify(|joined: &mut String| {
                    joined.push_str(separator);
                    joined.push_str(&value);
                })
                .or_insert_with(|| value.to_string());
        }
        collected
    }

    /// Sends the request and buffers the whole body.
    async fn exchange(&self, request: http::Request<Full<Bytes>>) -> Result<Response<Bytes>> {
        let response = self
            .inner
            .request(request)
            .await
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = Self::collect_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for HyperTransport {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let hyper_request = Self::build_hyper_request(request)?;

        match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.exchange(hyper_request))
                .await
                .map_err(|_| Error::Timeout)?,
            None => self.exchange(hyper_request).await,
        }
    }
}

/// Builder for [`HyperTransport`].
#[derive(Debug, Default)]
pub struct HyperTransportBuilder {
    config: TransportConfigBuilder,
}

impl HyperTransportBuilder {
    /// Bound every exchange, body included.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Bound the TCP connect phase.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Idle connections kept per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// How long an idle connection stays pooled.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Build the transport.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        HyperTransport::with_config(self.config.build())
    }
}
