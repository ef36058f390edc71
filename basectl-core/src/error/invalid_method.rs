//! The "400 Bad Request" error raised for unknown request methods.

use thiserror::Error;

use crate::error::error_impl::impl_into_basectl_error;

/// A request arrived with a method outside the fixed method enumeration.
///
/// The offending token is kept upper-cased, as it is reported to the client.
///
/// # Examples
///
/// ```
/// use basectl_core::error::InvalidMethod;
///
/// let error = InvalidMethod::new("foo");
/// assert_eq!(error.method, "FOO");
/// assert_eq!(error.to_string(), "Invalid request method: FOO");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid request method: {method}")]
pub struct InvalidMethod {
    /// The rejected method, upper-cased.
    pub method: String,
}
impl_into_basectl_error!(InvalidMethod, BAD_REQUEST);

impl InvalidMethod {
    /// Creates a new `InvalidMethod` error for the given method token.
    #[must_use]
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_uppercase(),
        }
    }
}
