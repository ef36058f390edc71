//! Serving a controller as a [`tower::Service`].
//!
//! [`ControllerService`] makes a controller usable wherever a `tower` service
//! over [`http`] requests is expected: the request head becomes a
//! [`RequestContext`], the request is dispatched without a continuation, and
//! the outcome is turned into a response.

use std::convert::Infallible;
use std::task::{Context as TaskContext, Poll};

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::HeaderValue;
use http::header::CONTENT_TYPE;
use http_body_util::Full;
use tower::Service;
use tracing::{debug, warn};

use crate::controller::Controller;
use crate::headers::PLAIN_TEXT_CONTENT_TYPE;
use crate::middleware::ControllerMiddleware;
use crate::{Error, RequestContext};

/// The response type produced by [`ControllerService`].
pub type ServiceResponse = http::Response<Full<Bytes>>;

/// A [`tower::Service`] dispatching every request to a fresh controller.
///
/// Errors never escape the service: an aborted request is answered with the
/// abort status code and its message as a plain-text body.
///
/// # Examples
///
/// ```
/// use basectl::service::ControllerService;
/// use basectl::{Controller, Exchange, ResponseBody, StatusCode};
/// use tower::ServiceExt;
///
/// #[derive(Default)]
/// struct Health;
///
/// #[basectl::async_trait]
/// impl Controller for Health {
///     async fn get(&mut self, _cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
///         Ok("ok".into())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let service = ControllerService::new(Health::middleware());
/// let request = http::Request::get("/health").body(()).unwrap();
/// let response = service.oneshot(request).await.unwrap();
/// assert_eq!(response.status(), StatusCode::OK);
/// # }
/// ```
pub struct ControllerService<C> {
    middleware: ControllerMiddleware<C>,
}

impl<C> std::fmt::Debug for ControllerService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerService")
            .field("middleware", &self.middleware)
            .finish()
    }
}

impl<C: Controller + 'static> ControllerService<C> {
    /// Creates a service dispatching through `middleware`.
    #[must_use]
    pub fn new(middleware: ControllerMiddleware<C>) -> Self {
        Self { middleware }
    }
}

impl<C> Clone for ControllerService<C> {
    fn clone(&self) -> Self {
        Self {
            middleware: self.middleware.clone(),
        }
    }
}

impl<C, B> Service<http::Request<B>> for ControllerService<C>
where
    C: Controller + 'static,
{
    type Response = ServiceResponse;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        let middleware = self.middleware.clone();
        let mut context = RequestContext::from_request(request);

        Box::pin(async move {
            let outcome = middleware.run(&mut context, None).await;
            let response = outcome
                .and_then(|()| context.into_bytes_response())
                .map_or_else(|error| error_response(&error), |response| response.map(Full::new));
            Ok(response)
        })
    }
}

fn error_response(error: &Error) -> ServiceResponse {
    let status = error.status_code();
    if status.is_server_error() {
        warn!(%status, %error, "request aborted");
    } else {
        debug!(%status, %error, "request aborted");
    }

    let mut response = http::Response::new(Full::new(Bytes::from(error.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(PLAIN_TEXT_CONTENT_TYPE));
    response
}
