//! Plugging controllers into a middleware chain.
//!
//! A middleware receives the request [`Context`] and, optionally, a [`Next`]
//! continuation that passes control to the rest of the chain.
//! [`ControllerMiddleware`] is the middleware entry point of a controller:
//! it creates a fresh controller and [`Dispatcher`] for every call.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::config::DispatchConfig;
use crate::controller::Controller;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::dispatch::Dispatcher;
use crate::{Context, Result};

/// The continuation of a middleware chain.
///
/// Calling it with the request context runs the remaining stages of the
/// chain.
pub type Next<'a> =
    Box<dyn for<'c> FnOnce(&'c mut dyn Context) -> BoxFuture<'c, Result<()>> + Send + 'a>;

/// Wraps a closure returning a boxed future into a [`Next`] continuation.
///
/// # Examples
///
/// ```
/// use basectl::middleware::next_fn;
/// use basectl::test::TestContextBuilder;
/// use basectl::{Context, ResponseBody};
/// use futures::FutureExt;
///
/// let next = next_fn(|context| {
///     async move {
///         context.set_body("downstream".into());
///         Ok::<_, basectl::Error>(())
///     }
///     .boxed()
/// });
///
/// let mut context = TestContextBuilder::get().build();
/// futures::executor::block_on(next(&mut context))?;
/// assert_eq!(context.body(), &ResponseBody::from("downstream"));
/// # Ok::<(), basectl::Error>(())
/// ```
pub fn next_fn<'a, F>(f: F) -> Next<'a>
where
    F: for<'c> FnOnce(&'c mut dyn Context) -> BoxFuture<'c, Result<()>> + Send + 'a,
{
    Box::new(f)
}

/// A stage of a middleware chain.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Processes the request, running `next` to pass control on.
    ///
    /// # Errors
    ///
    /// Returns the error the request was aborted with.
    async fn call<'a>(&self, context: &'a mut dyn Context, next: Option<Next<'a>>) -> Result<()>;
}

/// The middleware entry point of a controller.
///
/// Every call constructs a new controller with the factory and dispatches
/// the request to it, so controllers may keep per-request state in their
/// fields. Instances are never shared between requests.
///
/// # Examples
///
/// ```
/// use basectl::middleware::ControllerMiddleware;
/// use basectl::test::{ContinuationProbe, TestContextBuilder};
/// use basectl::{Controller, Exchange, ResponseBody};
///
/// struct Greeter {
///     greeting: &'static str,
/// }
///
/// #[basectl::async_trait]
/// impl Controller for Greeter {
///     async fn get(&mut self, _cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
///         Ok(self.greeting.into())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> basectl::Result<()> {
/// let middleware = ControllerMiddleware::new(|| Greeter { greeting: "hello" });
/// let probe = ContinuationProbe::new();
/// let mut context = TestContextBuilder::get().build();
///
/// middleware.run(&mut context, Some(probe.next())).await?;
/// assert_eq!(probe.calls(), 1);
/// # Ok(())
/// # }
/// ```
pub struct ControllerMiddleware<C> {
    factory: Arc<dyn Fn() -> C + Send + Sync>,
    config: Arc<DispatchConfig>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<C: Controller + 'static> ControllerMiddleware<C> {
    /// Creates a middleware building controllers with `factory`.
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            config: Arc::new(DispatchConfig::default()),
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Sets the configuration passed to every dispatcher.
    #[must_use]
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Sets the diagnostic sink passed to every dispatcher.
    #[must_use]
    pub fn diagnostics(mut self, diagnostics: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    /// Creates a dispatcher for one request, with a fresh controller.
    #[must_use]
    pub fn dispatcher<'a>(
        &self,
        context: &'a mut dyn Context,
        next: Option<Next<'a>>,
    ) -> Dispatcher<'a, C> {
        Dispatcher::new((self.factory)(), context, next)
            .with_config(Arc::clone(&self.config))
            .with_diagnostics(Arc::clone(&self.diagnostics))
    }

    /// Dispatches one request to a fresh controller.
    ///
    /// # Errors
    ///
    /// Returns the error the request was aborted with; see
    /// [`Dispatcher::dispatch`].
    pub async fn run<'a>(&self, context: &'a mut dyn Context, next: Option<Next<'a>>) -> Result<()> {
        self.dispatcher(context, next).dispatch().await
    }
}

impl<C> Clone for ControllerMiddleware<C> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            config: Arc::clone(&self.config),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}

impl<C> fmt::Debug for ControllerMiddleware<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerMiddleware")
            .field("controller", &std::any::type_name::<C>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: Controller + 'static> Middleware for ControllerMiddleware<C> {
    async fn call<'a>(&self, context: &'a mut dyn Context, next: Option<Next<'a>>) -> Result<()> {
        self.run(context, next).await
    }
}
