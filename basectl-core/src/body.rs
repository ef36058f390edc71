//! Response bodies produced by handlers.

use bytes::Bytes;
use serde::Serialize;

use crate::headers::{JSON_CONTENT_TYPE, OCTET_STREAM_CONTENT_TYPE, PLAIN_TEXT_CONTENT_TYPE};

/// The value a handler produces for the response body.
///
/// The body is assigned to the [`Context`](crate::Context) as is; turning it
/// into bytes is left to the host, usually through
/// [`ResponseBody::into_bytes`].
///
/// # Examples
///
/// ```
/// use basectl_core::ResponseBody;
///
/// assert_eq!(ResponseBody::from("hello"), ResponseBody::Text("hello".to_owned()));
/// assert_eq!(ResponseBody::from(()), ResponseBody::Empty);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseBody {
    /// No body.
    #[default]
    Empty,
    /// A UTF-8 text body.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
    /// A JSON document.
    Json(serde_json::Value),
}

impl ResponseBody {
    /// Serializes `value` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a 500 error if `value` cannot be represented as JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl_core::ResponseBody;
    /// use serde_json::json;
    ///
    /// let body = ResponseBody::json(&[1, 2, 3])?;
    /// assert_eq!(body, ResponseBody::Json(json!([1, 2, 3])));
    /// # Ok::<(), basectl_core::Error>(())
    /// ```
    pub fn json<T: Serialize + ?Sized>(value: &T) -> crate::Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Returns `true` for [`ResponseBody::Empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The content type matching this body, if it has one.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Text(_) => Some(PLAIN_TEXT_CONTENT_TYPE),
            Self::Bytes(_) => Some(OCTET_STREAM_CONTENT_TYPE),
            Self::Json(_) => Some(JSON_CONTENT_TYPE),
        }
    }

    /// Serializes the body into bytes.
    ///
    /// # Errors
    ///
    /// Returns a 500 error if a JSON body cannot be serialized.
    pub fn into_bytes(self) -> crate::Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Text(text) => Ok(Bytes::from(text)),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Json(value) => Ok(Bytes::from(serde_json::to_vec(&value)?)),
        }
    }
}

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::Empty
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<serde_json::Value> for ResponseBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_body_from_struct() {
        #[derive(Serialize)]
        struct Foo {
            foo: &'static str,
        }

        let body = ResponseBody::json(&Foo { foo: "bar" }).unwrap();

        assert_eq!(body, ResponseBody::Json(json!({ "foo": "bar" })));
        assert_eq!(body.content_type(), Some(JSON_CONTENT_TYPE));
        assert_eq!(
            body.into_bytes().unwrap(),
            Bytes::from_static(br#"{"foo":"bar"}"#)
        );
    }

    #[test]
    fn empty_body() {
        let body = ResponseBody::default();

        assert!(body.is_empty());
        assert_eq!(body.content_type(), None);
        assert!(body.into_bytes().unwrap().is_empty());
    }

    #[test]
    fn text_and_bytes_bodies() {
        assert_eq!(
            ResponseBody::from(String::from("hi")).content_type(),
            Some(PLAIN_TEXT_CONTENT_TYPE)
        );
        assert_eq!(
            ResponseBody::from(vec![1, 2]).into_bytes().unwrap(),
            Bytes::from_static(&[1, 2])
        );
    }
}
