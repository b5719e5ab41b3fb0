//! Configuration and capture policy for an error-reporting client.
//!
//! Derives a validated runtime configuration from a DSN plus environment
//! signals, and decides for each event whether it should be sent.
//!
//! # Example
//!
//! ```no_run
//! use raven_configuration::{ConfigError, ConfigurationBuilder, Subject};
//!
//! fn main() -> Result<(), ConfigError> {
//!     let mut config = ConfigurationBuilder::new()
//!         .with_standard_env()
//!         .environments(["production"])
//!         .build()?;
//!
//!     let subject = Subject::exception("IOError", "connection reset");
//!     if config.capture_allowed(Some(&subject)) && !config.exception_excluded(&subject) {
//!         // hand the event to the transport
//!     } else {
//!         tracing::info!("Not sending event: {}", config.error_messages());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod build_info;
mod builder;
mod callbacks;
mod capture;
mod config;
mod configuration;
mod dsn;
mod error;
mod logger;
mod release;
mod server_name;

pub use build_info::{BUILD_REVISION_ENV, CompiledCommandRunner, emit_git_revision};
pub use builder::ConfigurationBuilder;
pub use callbacks::{AsyncDispatch, Callback, ShouldCapture, Subject, TransportFailureCallback};
pub use config::{
    DEFAULT_APP_DIRS_PATTERN, DEFAULT_EXCLUDED_EXCEPTIONS, DEFAULT_PROCESSORS, Encoding,
    HEROKU_DYNO_METADATA, Processor, Settings,
};
pub use configuration::Configuration;
pub use dsn::{Dsn, default_port};
pub use error::ConfigError;
pub use logger::{Logger, TracingLogger};
pub use release::{CommandRunner, ReleaseDetector, SystemCommandRunner};
pub use server_name::resolve_server_name;

/// Re-exported for users who want to construct custom configuration providers.
pub use figment;

/// Creates a [`CompiledCommandRunner`] from the revision recorded at build time.
///
/// This macro reads the environment variable set by [`emit_git_revision`] in
/// build.rs. Pass the result to
/// [`ConfigurationBuilder::command_runner`] so release detection works on
/// hosts without a git checkout.
///
/// # Example
///
/// ```ignore
/// // In build.rs:
/// fn main() {
///     raven_configuration::emit_git_revision();
/// }
///
/// // In main.rs:
/// use raven_configuration::{ConfigurationBuilder, compiled_command_runner};
///
/// let config = ConfigurationBuilder::new()
///     .with_standard_env()
///     .command_runner(compiled_command_runner!())
///     .build()?;
/// ```
#[macro_export]
macro_rules! compiled_command_runner {
    () => {
        $crate::CompiledCommandRunner::new(option_env!("RAVEN_BUILD_REVISION"))
    };
}
