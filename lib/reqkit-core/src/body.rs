//! Encoding and decoding of message bodies.
//!
//! Request bodies travel as [`Bytes`]; these helpers produce them from serde
//! values and read response payloads back.

use bytes::Bytes;

use crate::{Error, Result};

/// Common MIME types for the `Content-Type` header.
///
/// Converts into `String`, so it can be passed wherever a content type is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// `text/plain`
    PlainText,
    /// `application/octet-stream`
    OctetStream,
}

impl ContentType {
    /// The MIME type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.as_str().to_string()
    }
}

/// Encode `value` as a JSON request body.
///
/// # Example
///
/// ```
/// use reqkit_core::to_json;
///
/// let body = to_json(&serde_json::json!({"sku": "A-17"})).expect("json");
/// assert_eq!(&body[..], br#"{"sku":"A-17"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Encode `value` as an urlencoded request body.
///
/// Sequences become repeated keys (`scope=read&scope=write`).
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_html_form::to_string(value)?))
}

/// Decode a JSON payload.
///
/// On failure the error names the offending field path, e.g. `items[2].price`.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        Error::json_deserialization(err.path().to_string(), err.inner().to_string())
    })
}

/// Decode an urlencoded payload.
pub fn from_form<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_html_form::from_bytes(bytes).map_err(|err| Error::FormDeserialization(err.to_string()))
}
