//! Error types for basectl.
//!
//! Every failure that ends a request, whether raised by the dispatcher or by
//! a controller, is an [`Error`] carrying an optional HTTP status code.

pub(crate) mod error_impl;
mod invalid_method;
mod not_implemented;

pub use error_impl::{Error, impl_into_basectl_error};
pub use invalid_method::InvalidMethod;
pub use not_implemented::NotImplemented;
