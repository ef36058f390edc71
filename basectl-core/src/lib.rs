//! Core types for basectl.
//!
//! This crate provides the building blocks shared by
//! [basectl](https://docs.rs/basectl/latest/basectl/): the HTTP method
//! enumeration, the request [`Context`](context::Context) contract, the
//! response body type, and the error type every abort is expressed with.
//!
//! Most applications should use the main `basectl` crate rather than
//! depending on `basectl-core` directly.

mod body;

pub mod context;
pub mod error;
pub mod headers;
pub mod method;

pub use body::ResponseBody;
pub use context::{Context, RequestContext};
pub use error::Error;
pub use method::Method;

/// A type alias for an HTTP status code.
pub type StatusCode = http::StatusCode;

/// A type alias for a result that can return an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
