//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use reqkit_core::prelude::*;
//! ```

pub use crate::{
    Auth, ContentType, DefaultErrorChecker, Error, ErrorChecker, Headers, HttpClient, HttpError,
    JsonDecoder, Method, Request, RequestBuilder, Requester, Response, ResponseDecoder, Result,
    from_json, to_form, to_json,
};
