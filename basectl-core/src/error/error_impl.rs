use std::error::Error as StdError;
use std::fmt::Display;
use std::ops::Deref;

use derive_more::with_trait::Debug;

use crate::StatusCode;

/// An error that ends the current request.
///
/// An `Error` wraps any source error and optionally declares the HTTP status
/// code the request should be aborted with. Errors that do not declare a
/// status code are reported as 500 Internal Server Error.
pub struct Error {
    repr: Box<ErrorImpl>,
}

impl Error {
    /// Create a new error with a custom error message or error type.
    ///
    /// This method is used to create a new error that does not have a specific
    /// HTTP status code associated with it. If in the chain of `Error` sources
    /// there is an error with a status code, it will be used instead. If not,
    /// the default status code of 500 Internal Server Error will be used.
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl_core::{Error, StatusCode};
    ///
    /// let error = Error::wrap(Error::with_status("gone", StatusCode::GONE));
    /// assert_eq!(error.status_code(), StatusCode::GONE);
    /// ```
    #[must_use]
    pub fn wrap<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self {
            repr: Box::new(ErrorImpl {
                inner: error.into(),
                status_code: None,
            }),
        }
    }

    /// Create a new error associated with a 500 Internal Server Error status
    /// code.
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl_core::Error;
    ///
    /// let error = Error::internal("An error occurred");
    /// let error = Error::internal(std::io::Error::other("An error occurred"));
    /// ```
    #[must_use]
    pub fn internal<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self::with_status(error, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create a new error with a custom error message or error type and a
    /// specific HTTP status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl_core::{Error, StatusCode};
    ///
    /// let error = Error::with_status("Invalid input", StatusCode::BAD_REQUEST);
    /// assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    /// assert_eq!(error.to_string(), "Invalid input");
    /// ```
    #[must_use]
    pub fn with_status<E>(error: E, status_code: StatusCode) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        let error = Self {
            repr: Box::new(ErrorImpl {
                inner: error.into(),
                status_code: Some(status_code),
            }),
        };
        Self::wrap(WithStatusCode(error))
    }

    /// Returns the HTTP status code associated with this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl_core::{Error, StatusCode};
    ///
    /// let error = Error::wrap("Something went wrong");
    /// assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    ///
    /// let error = Error::with_status("Bad request", StatusCode::BAD_REQUEST);
    /// assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    /// ```
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.declared_status_code()
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns the status code declared anywhere in the error chain, if any.
    ///
    /// Unlike [`Error::status_code`], this does not fall back to 500.
    #[must_use]
    pub fn declared_status_code(&self) -> Option<StatusCode> {
        self.inner().repr.status_code
    }

    /// Returns a reference to inner `Error`, if `self` is wrapping a wrapper.
    /// Otherwise, it returns `self`.
    ///
    /// If this error is a wrapper around another `Error`, this method will
    /// return the inner `Error` that has a specific status code.
    #[must_use]
    pub fn inner(&self) -> &Self {
        let mut error: &dyn StdError = self;
        while let Some(inner) = error.source() {
            if let Some(error) = inner.downcast_ref::<Self>()
                && !error.is_wrapper()
            {
                return error;
            }
            error = inner;
        }
        self
    }

    /// Returns `true` if this error has been created with [`Error::wrap`],
    /// which means it does not have a specific HTTP status code of its own.
    #[must_use]
    pub fn is_wrapper(&self) -> bool {
        self.repr.status_code.is_none()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.repr, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.repr.inner, f)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.repr.inner.source()
    }
}

impl Deref for Error {
    type Target = dyn StdError + Send + Sync;

    fn deref(&self) -> &Self::Target {
        &*self.repr.inner
    }
}

#[derive(Debug)]
struct ErrorImpl {
    inner: Box<dyn StdError + Send + Sync>,
    status_code: Option<StatusCode>,
}

/// Indicates that the inner `Error` has a status code associated with it.
///
/// This is important, as we need to have this `Error` to be returned
/// by `std::error::Error::source` to be able to extract the status code.
#[derive(Debug)]
struct WithStatusCode(Error);

impl Display for WithStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for WithStatusCode {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

/// Implements `From<$error_ty> for basectl_core::Error`, optionally binding
/// the error type to a status code.
///
/// # Examples
///
/// ```
/// use basectl_core::error::impl_into_basectl_error;
/// use basectl_core::{Error, StatusCode};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("no such widget")]
/// struct WidgetNotFound;
/// impl_into_basectl_error!(WidgetNotFound, NOT_FOUND);
///
/// let error = Error::from(WidgetNotFound);
/// assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
/// ```
#[macro_export]
macro_rules! impl_into_basectl_error {
    ($error_ty:ty) => {
        impl From<$error_ty> for $crate::Error {
            fn from(err: $error_ty) -> Self {
                $crate::Error::internal(err)
            }
        }
    };
    ($error_ty:ty, $status_code:ident) => {
        impl From<$error_ty> for $crate::Error {
            fn from(err: $error_ty) -> Self {
                $crate::Error::with_status(err, $crate::StatusCode::$status_code)
            }
        }
    };
}
pub use impl_into_basectl_error;

#[derive(Debug, thiserror::Error)]
#[error("failed to serialize the response body: {0}")]
struct SerializeBody(#[from] serde_json::Error);
impl_into_basectl_error!(SerializeBody);
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::from(SerializeBody(err))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid response header name: {0}")]
struct InvalidHeaderName(#[from] http::header::InvalidHeaderName);
impl_into_basectl_error!(InvalidHeaderName);
impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Error::from(InvalidHeaderName(err))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid response header value: {0}")]
struct InvalidHeaderValue(#[from] http::header::InvalidHeaderValue);
impl_into_basectl_error!(InvalidHeaderValue);
impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Error::from(InvalidHeaderValue(err))
    }
}
