//! Sinks for non-fatal diagnostics emitted while dispatching.
//!
//! Nothing the dispatcher reports through a [`DiagnosticSink`] affects the
//! request; the default [`TracingSink`] forwards everything to [`tracing`].

use tracing::warn;

/// A destination for non-fatal dispatcher warnings.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
///
/// use basectl::diagnostics::DiagnosticSink;
///
/// #[derive(Debug, Default)]
/// struct CountingSink(Mutex<usize>);
///
/// impl DiagnosticSink for CountingSink {
///     fn warn(&self, _message: &str) {
///         *self.0.lock().unwrap() += 1;
///     }
/// }
///
/// let sink = CountingSink::default();
/// sink.warn("something odd happened");
/// assert_eq!(*sink.0.lock().unwrap(), 1);
/// ```
pub trait DiagnosticSink: Send + Sync {
    /// Reports a warning.
    fn warn(&self, message: &str);
}

/// A [`DiagnosticSink`] emitting `WARN` level [`tracing`] events.
#[derive(Debug, Default, Copy, Clone)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        warn!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    #[traced_test]
    fn tracing_sink_emits_warning() {
        TracingSink.warn("continuation already ran");

        assert!(logs_contain("continuation already ran"));
    }
}
