//! HTTP client traits.
//!
//! - [`HttpClient`] - Low-level transport: executes one fully built request
//! - [`Requester`] - Base-URL client with the verb-specific operations
//!
//! Most users should use `reqkit::Client`, which implements [`Requester`] on
//! top of any [`HttpClient`]. Implement [`Requester`] directly to substitute
//! a fake in tests.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{Headers, Method, Request, Response, Result, append_query};

/// Core HTTP transport trait.
///
/// Implementations execute a single request and return the response with its
/// body fully buffered. Connection pooling, TLS and timeouts are the
/// transport's concern.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

// A transport shared with the caller stays owned by the caller.
impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        self.as_ref().execute(request)
    }
}

/// Base-URL HTTP client.
///
/// `path` is resolved against the client's base URL; a missing leading `/`
/// is added. Every error raised after a response arrived carries that
/// response (see [`crate::Error::response`]).
///
/// Only [`Requester::request`] and [`Requester::request_into`] must be
/// implemented; the verb methods delegate to them.
pub trait Requester: Send + Sync {
    /// Send a request and classify the response.
    fn request(
        &self,
        method: Method,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Send a request, classify the response and decode its body into `out`.
    ///
    /// `out` is only written when the response was accepted and decoded.
    fn request_into<T: DeserializeOwned + Send>(
        &self,
        method: Method,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
        out: &mut T,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// GET `path` with URL-encoded `query` pairs. Never sends a body.
    fn get(
        &self,
        path: &str,
        headers: Option<Headers>,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<Response>> + Send {
        let path = append_query(path, query);
        async move { self.request(Method::Get, &path, headers, None).await }
    }

    /// GET `path` and decode the body into `out`.
    fn get_into<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        headers: Option<Headers>,
        query: &[(&str, &str)],
        out: &mut T,
    ) -> impl Future<Output = Result<Response>> + Send {
        let path = append_query(path, query);
        async move {
            self.request_into(Method::Get, &path, headers, None, out)
                .await
        }
    }

    /// POST `body` to `path`.
    fn post(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request(Method::Post, path, headers, body)
    }

    /// POST `body` to `path` and decode the answer into `out`.
    fn post_into<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
        out: &mut T,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request_into(Method::Post, path, headers, body, out)
    }

    /// PUT `body` to `path`.
    fn put(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request(Method::Put, path, headers, body)
    }

    /// PUT `body` to `path` and decode the answer into `out`.
    fn put_into<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
        out: &mut T,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request_into(Method::Put, path, headers, body, out)
    }

    /// PATCH `path` with `body`.
    fn patch(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request(Method::Patch, path, headers, body)
    }

    /// PATCH `path` with `body` and decode the answer into `out`.
    fn patch_into<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
        out: &mut T,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request_into(Method::Patch, path, headers, body, out)
    }

    /// DELETE `path`, optionally with a body.
    fn delete(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request(Method::Delete, path, headers, body)
    }

    /// DELETE `path` and decode the answer into `out`.
    fn delete_into<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        headers: Option<Headers>,
        body: Option<Bytes>,
        out: &mut T,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.request_into(Method::Delete, path, headers, body, out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records what the verb methods forward.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(Method, String, bool)>>,
    }

    impl Recorder {
        fn record(&self, method: Method, path: &str, body: Option<&Bytes>) {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push((method, path.to_string(), body.is_some()));
        }

        fn calls(&self) -> Vec<(Method, String, bool)> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }
    }

    impl Requester for Recorder {
        async fn request(
            &self,
            method: Method,
            path: &str,
            _headers: Option<Headers>,
            body: Option<Bytes>,
        ) -> Result<Response> {
            // Suspend once, as a real transport would.
            tokio::task::yield_now().await;
            self.record(method, path, body.as_ref());
            Ok(Response::new(200, Headers::new(), Bytes::from_static(b"7")))
        }

        async fn request_into<T: DeserializeOwned + Send>(
            &self,
            method: Method,
            path: &str,
            headers: Option<Headers>,
            body: Option<Bytes>,
            out: &mut T,
        ) -> Result<Response> {
            let response = self.request(method, path, headers, body).await?;
            *out = response.json()?;
            Ok(response)
        }
    }

    #[tokio::test]
    async fn verbs_forward_method_and_body() {
        let recorder = Recorder::default();
        let body = Some(Bytes::from_static(b"{}"));

        recorder.post("/a", None, body.clone()).await.expect("post");
        recorder.put("/b", None, body.clone()).await.expect("put");
        recorder.patch("/c", None, body.clone()).await.expect("patch");
        recorder.delete("/d", None, None).await.expect("delete");

        assert_eq!(
            recorder.calls(),
            vec![
                (Method::Post, "/a".to_string(), true),
                (Method::Put, "/b".to_string(), true),
                (Method::Patch, "/c".to_string(), true),
                (Method::Delete, "/d".to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn get_appends_query_and_sends_no_body() {
        let recorder = Recorder::default();
        let mut out = 0_u32;

        recorder
            .get("search", None, &[("a", "1"), ("b", "x y")])
            .await
            .expect("get");
        recorder
            .get_into("/count", None, &[], &mut out)
            .await
            .expect("get_into");

        assert_eq!(out, 7);
        assert_eq!(
            recorder.calls(),
            vec![
                (Method::Get, "search?a=1&b=x+y".to_string(), false),
                (Method::Get, "/count".to_string(), false),
            ]
        );
    }
}
