//! Core types and traits for the reqkit HTTP client.
//!
//! This crate provides the transport-independent pieces:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response with a replayable body
//! - [`Error`], [`HttpError`] and [`Result`] - Error handling
//! - [`Auth`] - Authentication modes
//! - [`ErrorChecker`] - Pluggable response classification
//! - [`ResponseDecoder`] - Pluggable body decoding
//! - [`HttpClient`] - Transport trait for HTTP execution
//! - [`Requester`] - Base-URL client trait with verb-specific operations
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)

mod auth;
mod body;
mod checker;
mod client;
mod decoder;
mod error;
mod method;
pub mod prelude;
mod request;
mod response;

pub use auth::{AUTHORIZATION, Auth};
pub use body::{ContentType, from_form, from_json, to_form, to_json};
pub use checker::{DefaultErrorChecker, ErrorChecker};
pub use client::{HttpClient, Requester};
pub use decoder::{FormDecoder, JsonDecoder, ResponseDecoder};
pub use error::{BoxError, Error, HttpError, Result};
pub use method::Method;
pub use request::{Headers, Request, RequestBuilder, append_query, find_header, remove_header};
pub use response::Response;

// Re-export http crate types for status codes
pub use http::StatusCode;
