//! The per-request context shared with the host framework.
//!
//! A [`Context`] is what a controller sees of the request/response cycle: the
//! incoming method, the mutable response state, and the ability to abort the
//! request with a status code and a message. Host frameworks implement this
//! trait for their own request type; [`RequestContext`] is a ready-made
//! implementation backed by the [`http`] crate types.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, ResponseBody, StatusCode};

/// HTTP request head type.
pub type RequestHead = http::request::Parts;

/// The per-request state a controller operates on.
pub trait Context: Send {
    /// The raw request method, as sent by the client.
    fn method(&self) -> &str;

    /// The current response status code.
    fn status(&self) -> StatusCode;

    /// Sets the response status code.
    fn set_status(&mut self, status: StatusCode);

    /// The current response body.
    fn body(&self) -> &ResponseBody;

    /// Replaces the response body.
    fn set_body(&mut self, body: ResponseBody);

    /// The response headers set so far.
    fn headers(&self) -> &HeaderMap;

    /// Replaces all values of the header `name` with `values`, leaving other
    /// headers untouched.
    fn set_header(&mut self, name: HeaderName, values: Vec<HeaderValue>);

    /// Aborts the request with `status` and `message`.
    ///
    /// The returned error must be propagated by the caller; the request is
    /// considered terminated once it is.
    fn throw(&mut self, status: StatusCode, message: String) -> Error {
        Error::with_status(message, status)
    }
}

/// A [`Context`] backed by an [`http`] request head and an in-memory response.
///
/// The response status starts as 200 OK with an empty body and no headers.
///
/// # Examples
///
/// ```
/// use basectl_core::{Context, RequestContext, StatusCode};
///
/// let request = http::Request::post("/widgets").body(())?;
/// let mut context = RequestContext::from_request(request);
///
/// assert_eq!(context.method(), "POST");
/// assert_eq!(context.status(), StatusCode::OK);
///
/// context.set_status(StatusCode::CREATED);
/// let response = context.into_response();
/// assert_eq!(response.status(), StatusCode::CREATED);
/// # Ok::<(), http::Error>(())
/// ```
#[derive(Debug)]
pub struct RequestContext {
    head: RequestHead,
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

impl RequestContext {
    /// Creates a context for the given request head.
    #[must_use]
    pub fn new(head: RequestHead) -> Self {
        Self {
            head,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }

    /// Creates a context for `request`, discarding its body.
    #[must_use]
    pub fn from_request<B>(request: http::Request<B>) -> Self {
        let (head, _body) = request.into_parts();
        Self::new(head)
    }

    /// The request head.
    #[must_use]
    pub fn request_head(&self) -> &RequestHead {
        &self.head
    }

    /// Mutable access to the request head, for hosts that rewrite requests.
    pub fn request_head_mut(&mut self) -> &mut RequestHead {
        &mut self.head
    }

    /// Consumes the context, returning the response built so far.
    ///
    /// The body is returned unserialized; see [`ResponseBody::into_bytes`].
    #[must_use]
    pub fn into_response(self) -> http::Response<ResponseBody> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }

    /// Consumes the context, returning the response with a serialized body.
    ///
    /// A `content-type` header matching the body is added unless one was
    /// already set.
    ///
    /// # Errors
    ///
    /// Returns a 500 error if the body cannot be serialized.
    pub fn into_bytes_response(self) -> crate::Result<http::Response<bytes::Bytes>> {
        let (mut parts, body) = self.into_response().into_parts();
        if let Some(content_type) = body.content_type()
            && !parts.headers.contains_key(CONTENT_TYPE)
        {
            parts
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Ok(http::Response::from_parts(parts, body.into_bytes()?))
    }
}

impl Context for RequestContext {
    fn method(&self) -> &str {
        self.head.method.as_str()
    }

    fn status(&self) -> StatusCode {
        self.status
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn body(&self) -> &ResponseBody {
        &self.body
    }

    fn set_body(&mut self, body: ResponseBody) {
        self.body = body;
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn set_header(&mut self, name: HeaderName, values: Vec<HeaderValue>) {
        self.headers.remove(&name);
        for value in values {
            self.headers.append(name.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn context(method: &str) -> RequestContext {
        let request = http::Request::builder()
            .method(method)
            .uri("/")
            .body(())
            .unwrap();
        RequestContext::from_request(request)
    }

    #[test]
    fn defaults() {
        let context = context("GET");

        assert_eq!(context.method(), "GET");
        assert_eq!(context.status(), StatusCode::OK);
        assert!(context.body().is_empty());
        assert!(context.headers().is_empty());
    }

    #[test]
    fn keeps_unknown_methods() {
        assert_eq!(context("FOO").method(), "FOO");
    }

    #[test]
    fn set_header_replaces_only_named_header() {
        let mut context = context("GET");
        context.set_header(
            HeaderName::from_static("x-keep"),
            vec![HeaderValue::from_static("1")],
        );
        context.set_header(
            HeaderName::from_static("x-foo"),
            vec![HeaderValue::from_static("a"), HeaderValue::from_static("b")],
        );
        context.set_header(
            HeaderName::from_static("x-foo"),
            vec![HeaderValue::from_static("c")],
        );

        assert_eq!(context.headers()["x-keep"], "1");
        let values: Vec<_> = context.headers().get_all("x-foo").iter().collect();
        assert_eq!(values, vec![&HeaderValue::from_static("c")]);
    }

    #[test]
    fn throw_produces_status_error() {
        let mut context = context("GET");

        let error = context.throw(StatusCode::IM_A_TEAPOT, "I'm a teapot".to_owned());

        assert_eq!(error.status_code(), StatusCode::IM_A_TEAPOT);
        assert_eq!(error.to_string(), "I'm a teapot");
    }

    #[test]
    fn bytes_response_sets_content_type() {
        let mut context = context("GET");
        context.set_body(ResponseBody::Json(json!({ "foo": "bar" })));

        let response = context.into_bytes_response().unwrap();

        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(response.body().as_ref(), br#"{"foo":"bar"}"#);
    }

    #[test]
    fn bytes_response_keeps_explicit_content_type() {
        let mut context = context("GET");
        context.set_header(CONTENT_TYPE, vec![HeaderValue::from_static("text/csv")]);
        context.set_body(ResponseBody::from("a,b"));

        let response = context.into_bytes_response().unwrap();

        assert_eq!(response.headers()[CONTENT_TYPE], "text/csv");
    }
}
