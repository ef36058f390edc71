//! The [`Controller`] trait.
//!
//! A controller groups the handlers of one resource, one per HTTP method.
//! Every handler has a default implementation that rejects the request with
//! "501 Not Implemented", so a controller only overrides the methods it
//! supports. The [`Dispatcher`](crate::Dispatcher) picks the handler matching
//! the request method.

use async_trait::async_trait;
use basectl_core::error::NotImplemented;

use crate::dispatch::Exchange;
use crate::middleware::ControllerMiddleware;
use crate::{Method, ResponseBody, Result};

/// A resource controller with one optional handler per HTTP method.
///
/// Handlers return the response body; the status code and headers are left
/// untouched unless the handler changes them through the [`Exchange`].
///
/// # Examples
///
/// ```
/// use basectl::{Controller, Dispatcher, Exchange, ResponseBody, StatusCode};
/// use basectl::test::TestContextBuilder;
///
/// struct Widgets;
///
/// #[basectl::async_trait]
/// impl Controller for Widgets {
///     async fn get(&mut self, _cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
///         ResponseBody::json(&["sprocket", "gear"])
///     }
///
///     async fn delete(&mut self, cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
///         Err(cx.error(StatusCode::FORBIDDEN, "widgets are forever"))
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> basectl::Result<()> {
/// let mut context = TestContextBuilder::get().build();
/// Dispatcher::new(Widgets, &mut context, None).dispatch().await?;
/// # Ok(())
/// # }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a controller",
    label = "not a controller",
    note = "implement `basectl::Controller` for `{Self}`, overriding the handlers it supports"
)]
#[async_trait]
pub trait Controller: Send {
    /// Handles `GET` requests.
    async fn get(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Get).into())
    }

    /// Handles `POST` requests.
    async fn post(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Post).into())
    }

    /// Handles `PUT` requests.
    async fn put(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Put).into())
    }

    /// Handles `PATCH` requests.
    async fn patch(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Patch).into())
    }

    /// Handles `DELETE` requests.
    async fn delete(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Delete).into())
    }

    /// Handles `HEAD` requests.
    async fn head(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Head).into())
    }

    /// Handles `CONNECT` requests.
    async fn connect(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Connect).into())
    }

    /// Handles `OPTIONS` requests.
    async fn options(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Options).into())
    }

    /// Handles `TRACE` requests.
    async fn trace(&mut self, _cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        Err(NotImplemented::new(Method::Trace).into())
    }

    /// Invokes the handler for `method`.
    ///
    /// There is usually no reason to override this.
    async fn handle(&mut self, method: Method, cx: &mut Exchange<'_>) -> Result<ResponseBody> {
        match method {
            Method::Get => self.get(cx).await,
            Method::Post => self.post(cx).await,
            Method::Put => self.put(cx).await,
            Method::Patch => self.patch(cx).await,
            Method::Delete => self.delete(cx).await,
            Method::Head => self.head(cx).await,
            Method::Connect => self.connect(cx).await,
            Method::Options => self.options(cx).await,
            Method::Trace => self.trace(cx).await,
        }
    }

    /// Returns a middleware that dispatches every request to a fresh
    /// `Self::default()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl::{Controller, Exchange, ResponseBody};
    /// use basectl::test::TestContextBuilder;
    ///
    /// #[derive(Default)]
    /// struct Ping;
    ///
    /// #[basectl::async_trait]
    /// impl Controller for Ping {
    ///     async fn get(&mut self, _cx: &mut Exchange<'_>) -> basectl::Result<ResponseBody> {
    ///         Ok("pong".into())
    ///     }
    /// }
    ///
    /// # #[tokio::main]
    /// # async fn main() -> basectl::Result<()> {
    /// let middleware = Ping::middleware();
    /// let mut context = TestContextBuilder::get().build();
    /// middleware.run(&mut context, None).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    fn middleware() -> ControllerMiddleware<Self>
    where
        Self: Sized + Default + 'static,
    {
        ControllerMiddleware::new(Self::default)
    }
}
