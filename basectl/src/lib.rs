//! Class-style resource controllers for middleware HTTP stacks.
//!
//! A [`Controller`] groups the handlers of a resource, one per HTTP method.
//! For every request, a [`Dispatcher`] picks the handler matching the request
//! method, stores what it returns as the response body, and runs the
//! middleware continuation exactly once. Requests with an unknown method are
//! rejected with 400 Bad Request, and methods the controller does not handle
//! with 501 Not Implemented.
//!
//! Controllers plug into a host either as a [`middleware::Middleware`]
//! operating on a [`Context`], or as a [`tower::Service`] through
//! [`service::ControllerService`].
//!
//! # Examples
//!
//! ```
//! use basectl::test::{ContinuationProbe, TestContextBuilder};
//! use basectl::{Context, Controller, Dispatcher, Exchange, ResponseBody, StatusCode};
//!
//! struct Articles;
//!
//! #[basectl::async_trait]
//! impl Controller for Articles {
//!     async fn get(&mut self, _cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
//!         Ok(serde_json::json!({ "title": "Hello" }).into())
//!     }
//!
//!     async fn post(&mut self, cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
//!         cx.set_response_status(StatusCode::CREATED);
//!         cx.set_response_headers([("Location", "/articles/1")])?;
//!         Ok(().into())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> basectl::Result<()> {
//! let probe = ContinuationProbe::new();
//! let mut context = TestContextBuilder::post().build();
//! Dispatcher::new(Articles, &mut context, Some(probe.next()))
//!     .dispatch()
//!     .await?;
//!
//! assert_eq!(context.status(), StatusCode::CREATED);
//! assert_eq!(context.headers()["location"], "/articles/1");
//! assert_eq!(probe.calls(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
mod controller;
pub mod diagnostics;
mod dispatch;
pub mod middleware;
pub mod service;

pub use async_trait::async_trait;
pub use basectl_core::{
    Context, Error, Method, RequestContext, ResponseBody, Result, StatusCode, error, headers,
};
pub use controller::Controller;
pub use dispatch::{Dispatcher, Exchange};
