//! Response classification.
//!
//! An [`ErrorChecker`] decides whether a received response counts as a
//! failure. It sees the outgoing request and the buffered response; reading
//! the body does not consume it.

use crate::{Error, HttpError, Request, Response, Result};

/// Trait for classifying responses as success or error.
///
/// Return `Ok(())` to accept the response. Any error returned is handed back
/// to the caller together with the response; use [`Error::custom`] to report
/// your own error types.
///
/// Closures with the matching signature implement this trait.
///
/// # Example
///
/// ```
/// use reqkit_core::{Error, ErrorChecker, Request, Response, Result};
///
/// /// Treats `404 Not Found` as a valid, empty answer.
/// fn allow_not_found(_req: &Request, res: &Response) -> Result<()> {
///     if res.is_success() || res.status() == 404 {
///         Ok(())
///     } else {
///         Err(Error::custom(format!("unexpected status {}", res.status())))
///     }
/// }
///
/// let checker: &dyn ErrorChecker = &allow_not_found;
/// # let _ = checker;
/// ```
pub trait ErrorChecker: Send + Sync + 'static {
    /// Inspect a completed exchange.
    fn check(&self, request: &Request, response: &Response) -> Result<()>;
}

impl<F> ErrorChecker for F
where
    F: Fn(&Request, &Response) -> Result<()> + Send + Sync + 'static,
{
    fn check(&self, request: &Request, response: &Response) -> Result<()> {
        self(request, response)
    }
}

/// Flags every status outside `200..300` as an [`HttpError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorChecker;

impl ErrorChecker for DefaultErrorChecker {
    fn check(&self, _request: &Request, response: &Response) -> Result<()> {
        if response.is_success() {
            Ok(())
        } else {
            Err(Error::Http(HttpError::new(response.clone())))
        }
    }
}
