//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! for easy glob importing:
//!
//! ```ignore
//! use reqkit::prelude::*;
//! ```

pub use crate::{
    Auth, Client, ClientBuilder, ClientOption, ContentType, Error, ErrorChecker, Headers,
    HttpClient, HttpError, HyperTransport, JsonDecoder, Method, Request, Requester, Response,
    ResponseDecoder, Result, StatusCode, to_json,
};
pub use serde::{Deserialize, Serialize};
