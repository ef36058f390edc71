//! The fixed set of HTTP methods a controller can handle.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::InvalidMethod;

/// An HTTP method token a controller may define a handler for.
///
/// Parsing is case-insensitive. [`Method::as_str`] returns the lowercase
/// token, while [`Display`] renders the uppercase form used in responses.
///
/// # Examples
///
/// ```
/// use basectl_core::Method;
///
/// let method: Method = "Patch".parse()?;
/// assert_eq!(method, Method::Patch);
/// assert_eq!(method.as_str(), "patch");
/// assert_eq!(method.to_string(), "PATCH");
/// # Ok::<(), basectl_core::error::InvalidMethod>(())
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `CONNECT`
    Connect,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Connect,
        Method::Options,
        Method::Trace,
    ];

    /// Returns the lowercase method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Connect => "connect",
            Method::Options => "options",
            Method::Trace => "trace",
        }
    }

    /// Returns the corresponding [`http::Method`].
    #[must_use]
    pub fn to_http(self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
            Method::Head => http::Method::HEAD,
            Method::Connect => http::Method::CONNECT,
            Method::Options => http::Method::OPTIONS,
            Method::Trace => http::Method::TRACE,
        }
    }
}

impl FromStr for Method {
    type Err = InvalidMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_ascii_lowercase();
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == token)
            .ok_or_else(|| InvalidMethod::new(s))
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = InvalidMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>(), Ok(method));
            assert_eq!(method.to_string().parse::<Method>(), Ok(method));
        }
        assert_eq!("dElEtE".parse::<Method>(), Ok(Method::Delete));
    }

    #[test]
    fn parse_rejects_unknown_tokens() {
        let error = "foo".parse::<Method>().unwrap_err();

        assert_eq!(error.method, "FOO");
        assert_eq!(error.to_string(), "Invalid request method: FOO");
        assert!("".parse::<Method>().is_err());
        assert!("PROPFIND".parse::<Method>().is_err());
    }

    #[test]
    fn http_method_conversion() {
        for method in Method::ALL {
            assert_eq!(Method::try_from(&method.to_http()), Ok(method));
        }
        let custom = http::Method::from_bytes(b"FOO").unwrap();
        assert!(Method::try_from(&custom).is_err());
    }
}
