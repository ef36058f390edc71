//! Dispatching requests to controller handlers.
//!
//! A [`Dispatcher`] is created for every request. It owns the controller
//! instance and an [`Exchange`], the handle handlers use to reach the request
//! [`Context`], the middleware continuation, and the response mutators.

use std::sync::Arc;

use derive_more::Debug;
use http::HeaderName;
use tracing::{debug, trace};

use crate::config::DispatchConfig;
use crate::controller::Controller;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::headers::HeaderValues;
use crate::middleware::Next;
use crate::{Context, Error, Method, ResponseBody, Result, StatusCode};

/// The handler-facing side of a request being dispatched.
///
/// An `Exchange` borrows the request [`Context`] for the duration of the
/// request and tracks whether the middleware continuation has run.
#[derive(Debug)]
pub struct Exchange<'a> {
    #[debug(skip)]
    context: &'a mut dyn Context,
    #[debug(skip)]
    next: Option<Next<'a>>,
    next_called: bool,
    config: Arc<DispatchConfig>,
    #[debug(skip)]
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<'a> Exchange<'a> {
    fn new(context: &'a mut dyn Context, next: Option<Next<'a>>) -> Self {
        Self {
            context,
            next,
            next_called: false,
            config: Arc::new(DispatchConfig::default()),
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// The raw request method.
    #[must_use]
    pub fn method(&self) -> &str {
        self.context.method()
    }

    /// The request context.
    #[must_use]
    pub fn context(&self) -> &(dyn Context + 'a) {
        &*self.context
    }

    /// Mutable access to the request context.
    pub fn context_mut(&mut self) -> &mut (dyn Context + 'a) {
        &mut *self.context
    }

    /// Sets the response status code.
    pub fn set_response_status(&mut self, status: StatusCode) {
        self.context.set_status(status);
    }

    /// Merges `headers` into the response headers.
    ///
    /// Each header named in `headers` replaces the values previously set
    /// under that name; headers not named are kept. Names are
    /// case-insensitive and stored lowercase.
    ///
    /// # Errors
    ///
    /// Returns an error if a name or value is not a valid HTTP header name or
    /// value. Headers preceding the invalid one have already been set.
    pub fn set_response_headers<I, K, V>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValues>,
    {
        for (name, values) in headers {
            let name = HeaderName::from_bytes(name.as_ref().as_bytes())?;
            let values = values.into().into_header_values()?;
            self.context.set_header(name, values);
        }
        Ok(())
    }

    /// Sets the response body.
    pub fn set_response_body(&mut self, body: impl Into<ResponseBody>) {
        self.context.set_body(body.into());
    }

    /// Runs the middleware continuation, unless it has already run.
    ///
    /// The continuation receives the request context, so later stages of
    /// the chain see the response built so far.
    ///
    /// Calling `next()` again after the continuation has run does nothing
    /// except report a warning to the diagnostic sink. Without a
    /// continuation this is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the error of a failing continuation. A failed continuation
    /// is not considered to have run, and is not run again.
    pub async fn next(&mut self) -> Result<()> {
        if let Some(next) = self.next.take() {
            trace!("running the middleware continuation");
            next(&mut *self.context).await?;
            self.next_called = true;
        } else if self.next_called && self.config.warn_on_repeated_next {
            self.diagnostics
                .warn("The 'next' function was called, but it has already been run.");
        }
        Ok(())
    }

    /// Returns `true` once the continuation has run successfully.
    #[must_use]
    pub fn continuation_called(&self) -> bool {
        self.next_called
    }

    /// Returns `true` if a continuation was supplied and has not been
    /// consumed yet.
    #[must_use]
    pub fn has_pending_continuation(&self) -> bool {
        self.next.is_some()
    }

    /// Aborts the request with `status` and a client-visible `message`.
    ///
    /// Return the resulting error from the handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl::{Controller, Dispatcher, Exchange, ResponseBody, StatusCode};
    /// use basectl::test::TestContextBuilder;
    ///
    /// struct Teapot;
    ///
    /// #[basectl::async_trait]
    /// impl Controller for Teapot {
    ///     async fn post(&mut self, cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
    ///         Err(cx.error(StatusCode::IM_A_TEAPOT, "I'm a teapot"))
    ///     }
    /// }
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let mut context = TestContextBuilder::post().build();
    /// let error = Dispatcher::new(Teapot, &mut context, None)
    ///     .dispatch()
    ///     .await
    ///     .unwrap_err();
    /// assert_eq!(error.status_code(), StatusCode::IM_A_TEAPOT);
    /// assert_eq!(error.to_string(), "I'm a teapot");
    /// # }
    /// ```
    #[must_use]
    pub fn error(&mut self, status: StatusCode, message: impl Into<String>) -> Error {
        self.context.throw(status, message.into())
    }
}

/// Dispatches a request to the handler of a [`Controller`].
///
/// A dispatcher can only be created for a type implementing [`Controller`];
/// there is no controller-less base to instantiate:
///
/// ```compile_fail
/// use basectl::Dispatcher;
/// use basectl::test::TestContextBuilder;
///
/// struct NotAController;
///
/// let mut context = TestContextBuilder::get().build();
/// let dispatcher = Dispatcher::new(NotAController, &mut context, None);
/// ```
pub struct Dispatcher<'a, C> {
    controller: C,
    exchange: Exchange<'a>,
}

impl<C> std::fmt::Debug for Dispatcher<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("controller", &std::any::type_name::<C>())
            .field("exchange", &self.exchange)
            .finish()
    }
}

impl<'a, C: Controller> Dispatcher<'a, C> {
    /// Creates a dispatcher for a single request.
    ///
    /// `next` is the continuation of the middleware chain, if there is one.
    #[must_use]
    pub fn new(controller: C, context: &'a mut dyn Context, next: Option<Next<'a>>) -> Self {
        Self {
            controller,
            exchange: Exchange::new(context, next),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: Arc<DispatchConfig>) -> Self {
        self.exchange.config = config;
        self
    }

    /// Replaces the sink warnings are reported to. Defaults to
    /// [`TracingSink`].
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.exchange.diagnostics = diagnostics;
        self
    }

    /// The controller instance.
    #[must_use]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Consumes the dispatcher, returning the controller instance.
    #[must_use]
    pub fn into_controller(self) -> C {
        self.controller
    }

    /// The exchange handed to handlers.
    #[must_use]
    pub fn exchange(&self) -> &Exchange<'a> {
        &self.exchange
    }

    /// Mutable access to the exchange handed to handlers.
    pub fn exchange_mut(&mut self) -> &mut Exchange<'a> {
        &mut self.exchange
    }

    /// Sets the response status code. See [`Exchange::set_response_status`].
    pub fn set_response_status(&mut self, status: StatusCode) {
        self.exchange.set_response_status(status);
    }

    /// Merges headers into the response. See
    /// [`Exchange::set_response_headers`].
    ///
    /// # Errors
    ///
    /// Returns an error if a name or value is not a valid header name or
    /// value.
    pub fn set_response_headers<I, K, V>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValues>,
    {
        self.exchange.set_response_headers(headers)
    }

    /// Sets the response body. See [`Exchange::set_response_body`].
    pub fn set_response_body(&mut self, body: impl Into<ResponseBody>) {
        self.exchange.set_response_body(body);
    }

    /// Runs the middleware continuation unless it has already run. See
    /// [`Exchange::next`].
    ///
    /// # Errors
    ///
    /// Propagates the error of a failing continuation.
    pub async fn next(&mut self) -> Result<()> {
        self.exchange.next().await
    }

    /// Aborts the request with `status` and `message`. See
    /// [`Exchange::error`].
    #[must_use]
    pub fn error(&mut self, status: StatusCode, message: impl Into<String>) -> Error {
        self.exchange.error(status, message)
    }

    /// Dispatches the request to the handler matching its method.
    ///
    /// On success the handler's return value becomes the response body and
    /// the continuation is run, unless the handler already ran it.
    ///
    /// # Errors
    ///
    /// The request is aborted through [`Context::throw`] and the resulting
    /// error returned when:
    ///
    /// * the method is not one of [`Method::ALL`] (400 Bad Request),
    /// * the controller does not handle the method (501 Not Implemented),
    /// * the handler or the continuation fails (the error's status code, or
    ///   500 if it has none).
    pub async fn dispatch(&mut self) -> Result<()> {
        let method = match self.exchange.method().parse::<Method>() {
            Ok(method) => method,
            Err(invalid) => {
                debug!(method = %invalid.method, "rejecting request with an invalid method");
                return Err(self
                    .exchange
                    .error(StatusCode::BAD_REQUEST, invalid.to_string()));
            }
        };

        debug!(
            %method,
            controller = std::any::type_name::<C>(),
            "dispatching request"
        );
        match self.run_handler(method).await {
            Ok(()) => Ok(()),
            Err(error) => {
                let status = error.status_code();
                let mut message = error.to_string();
                if message.is_empty() && error.declared_status_code().is_none() {
                    message.clone_from(&self.exchange.config.fallback_error_message);
                }
                debug!(%method, %status, %message, "handler failed, aborting request");
                Err(self.exchange.error(status, message))
            }
        }
    }

    async fn run_handler(&mut self, method: Method) -> Result<()> {
        let body = self.controller.handle(method, &mut self.exchange).await?;
        self.exchange.set_response_body(body);
        if !self.exchange.continuation_called() {
            self.exchange.next().await?;
        }
        Ok(())
    }
}
