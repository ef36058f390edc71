//! Configuration for the dispatcher.
//!
//! The main struct in this module is [`DispatchConfig`]. It can be created
//! with [`DispatchConfig::builder`] or loaded from a TOML document with
//! [`DispatchConfig::from_toml`], and is passed to a
//! [`Dispatcher`](crate::Dispatcher) or
//! [`ControllerMiddleware`](crate::middleware::ControllerMiddleware).

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::impl_into_basectl_error;

/// The message used when a failing handler reports an empty error message.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Dispatcher behavior that can be tuned per deployment.
///
/// # Examples
///
/// ```
/// use basectl::config::DispatchConfig;
///
/// let config = DispatchConfig::from_toml(
///     r#"
/// fallback_error_message = "Something broke"
/// "#,
/// )?;
///
/// assert_eq!(config.fallback_error_message, "Something broke");
/// assert!(config.warn_on_repeated_next);
/// # Ok::<(), basectl::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(build_fn(skip, error = std::convert::Infallible))]
#[serde(default)]
pub struct DispatchConfig {
    /// The message a request is aborted with when the handler's error has an
    /// empty message.
    #[builder(setter(into))]
    pub fallback_error_message: String,
    /// Whether calling `next()` after the continuation already ran emits a
    /// warning through the diagnostic sink.
    pub warn_on_repeated_next: bool,
}

impl DispatchConfig {
    /// Create a new [`DispatchConfigBuilder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use basectl::config::DispatchConfig;
    ///
    /// let config = DispatchConfig::builder()
    ///     .warn_on_repeated_next(false)
    ///     .build();
    /// assert!(!config.warn_on_repeated_next);
    /// ```
    #[must_use]
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::default()
    }

    /// Parses a TOML document. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or contains values
    /// of the wrong type.
    pub fn from_toml(toml_content: &str) -> crate::Result<DispatchConfig> {
        let config: DispatchConfig = toml::from_str(toml_content).map_err(ParseConfig)?;
        Ok(config)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DispatchConfigBuilder {
    /// Builds the dispatcher configuration.
    #[must_use]
    pub fn build(&self) -> DispatchConfig {
        DispatchConfig {
            fallback_error_message: self
                .fallback_error_message
                .clone()
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned()),
            warn_on_repeated_next: self.warn_on_repeated_next.unwrap_or(true),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("could not parse the dispatcher configuration: {0}")]
struct ParseConfig(toml::de::Error);
impl_into_basectl_error!(ParseConfig);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DispatchConfig::default();

        assert_eq!(config.fallback_error_message, DEFAULT_ERROR_MESSAGE);
        assert!(config.warn_on_repeated_next);
        assert_eq!(DispatchConfig::from_toml("").unwrap(), config);
    }

    #[test]
    fn from_toml_full() {
        let config = DispatchConfig::from_toml(
            r#"
            fallback_error_message = "Oops"
            warn_on_repeated_next = false
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            DispatchConfig::builder()
                .fallback_error_message("Oops")
                .warn_on_repeated_next(false)
                .build()
        );
    }

    #[test]
    fn from_toml_invalid() {
        let error = DispatchConfig::from_toml("warn_on_repeated_next = \"yes\"").unwrap_err();

        assert_eq!(error.status_code(), crate::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            error
                .to_string()
                .contains("could not parse the dispatcher configuration")
        );
    }
}
