//! Error types for configuration loading.

use figment::Error as FigmentError;

/// Errors from assembling a [`Configuration`](crate::Configuration).
///
/// An incomplete configuration is not an error: missing DSN components are
/// reported through [`Configuration::errors`](crate::Configuration::errors)
/// when a capture decision is evaluated.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Failed to extract configuration from sources.
    #[error("configuration error: {0}")]
    Config(#[source] Box<FigmentError>),

    /// The DSN could not be parsed as a URI.
    #[error("invalid DSN: {dsn}")]
    InvalidDsn {
        /// The DSN that was provided, with any secret key removed.
        dsn: String,
        /// The underlying URI parse failure.
        #[source]
        source: url::ParseError,
    },
}
