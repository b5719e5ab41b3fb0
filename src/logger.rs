//! The logger collaborator.

/// Sink for diagnostics that the configuration reports to the host
/// application.
///
/// Only non-fatal problems are reported here, such as unreadable platform
/// metadata during release detection.
pub trait Logger: Send + Sync {
    /// Reports an error.
    fn error(&self, message: &str);
}

/// Forwards diagnostics to `tracing` with target `raven`.
///
/// This is the default logger. Enable it in your filter with
/// `RUST_LOG=raven=error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, message: &str) {
        tracing::error!(target: "raven", "{message}");
    }
}
