//! Response body decoding.

use serde::de::DeserializeOwned;

use crate::{Result, from_form, from_json};

/// Trait for parsing a buffered response body into a caller-provided value.
///
/// The decoder only runs when the caller asked for output and the error
/// checker accepted the response.
pub trait ResponseDecoder: Send + Sync + 'static {
    /// Parse `body` into a `T`.
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T>;

    /// Parse `body` into `out`.
    ///
    /// `out` is left untouched when decoding fails.
    fn decode_into<T: DeserializeOwned>(&self, body: &[u8], out: &mut T) -> Result<()> {
        *out = self.decode(body)?;
        Ok(())
    }
}

/// Decodes JSON bodies, reporting the path of the offending field on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        from_json(body)
    }
}

/// Decodes `application/x-www-form-urlencoded` bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormDecoder;

impl ResponseDecoder for FormDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        from_form(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct Token {
        access_token: String,
        expires_in: u32,
    }

    #[test]
    fn json_decoder_decodes_into_out() {
        let mut token = Token::default();
        JsonDecoder
            .decode_into(br#"{"access_token":"abc","expires_in":60}"#, &mut token)
            .expect("decode");

        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, 60);
    }

    #[test]
    fn failed_decode_leaves_out_untouched() {
        let mut token = Token {
            access_token: "previous".to_string(),
            expires_in: 1,
        };

        let err = JsonDecoder
            .decode_into(br#"{"access_token":"abc""#, &mut token)
            .expect_err("truncated json");

        assert!(err.to_string().contains("JSON deserialization error"));
        assert_eq!(token.access_token, "previous");
        assert_eq!(token.expires_in, 1);
    }

    #[test]
    fn form_decoder() {
        let token: Token = FormDecoder
            .decode(b"access_token=a%20b&expires_in=3600")
            .expect("decode");

        assert_eq!(
            token,
            Token {
                access_token: "a b".to_string(),
                expires_in: 3600,
            }
        );
    }
}
