//! HTTP header constants and header value helpers.

use http::HeaderValue;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const PLAIN_TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

/// One or more values for a single response header.
///
/// # Examples
///
/// ```
/// use basectl_core::headers::HeaderValues;
///
/// let single = HeaderValues::from("no-cache");
/// let many = HeaderValues::from(vec!["a=1", "b=2"]);
/// assert_eq!(single.len(), 1);
/// assert_eq!(many.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValues {
    /// A single value.
    Single(String),
    /// Several values, each sent as its own header line.
    Multiple(Vec<String>),
}

impl HeaderValues {
    /// The number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(values) => values.len(),
        }
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts the values into [`HeaderValue`]s.
    ///
    /// # Errors
    ///
    /// Returns an error if any value contains characters not allowed in a
    /// header.
    pub fn into_header_values(self) -> crate::Result<Vec<HeaderValue>> {
        match self {
            Self::Single(value) => Ok(vec![HeaderValue::try_from(value)?]),
            Self::Multiple(values) => values
                .into_iter()
                .map(|value| HeaderValue::try_from(value).map_err(crate::Error::from))
                .collect(),
        }
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for HeaderValues {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValues {
    fn from(values: [&str; N]) -> Self {
        Self::Multiple(values.into_iter().map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_values_convert_in_order() {
        let values = HeaderValues::from(["a=1", "b=2"])
            .into_header_values()
            .unwrap();

        assert_eq!(values, vec![HeaderValue::from_static("a=1"), HeaderValue::from_static("b=2")]);
    }

    #[test]
    fn invalid_value_is_rejected() {
        let error = HeaderValues::from("bad\nvalue")
            .into_header_values()
            .unwrap_err();

        assert!(error.to_string().contains("invalid response header value"));
    }
}
