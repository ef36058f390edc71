//! The "501 Not Implemented" error raised for methods without a handler.

use thiserror::Error;

use crate::Method;
use crate::error::error_impl::impl_into_basectl_error;

#[expect(clippy::doc_link_with_quotes, reason = "501 Not Implemented link")]
/// A ["501 Not Implemented"] error, returned when a controller defines no
/// handler for a valid request method.
///
/// # Examples
///
/// ```
/// use basectl_core::Method;
/// use basectl_core::error::NotImplemented;
///
/// let error = NotImplemented::new(Method::Get);
/// assert_eq!(error.to_string(), "GET method not implemented");
/// ```
///
/// ["501 Not Implemented"]: https://developer.mozilla.org/en-US/docs/Web/HTTP/Reference/Status/501
#[non_exhaustive]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("{method} method not implemented")]
pub struct NotImplemented {
    /// The method that has no handler.
    pub method: Method,
}
impl_into_basectl_error!(NotImplemented, NOT_IMPLEMENTED);

impl NotImplemented {
    /// Creates a new `NotImplemented` error for the given method.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}
