//! Example demonstrating layered configuration.
//!
//! This shows how configuration is merged from multiple sources with clear
//! precedence: defaults → files → environment variables → programmatic.
//!
//! Run with: RAVEN_CONNECT_TIMEOUT=3s KEMAL_ENV=production cargo run --example configuration_layers

use raven_configuration::{ConfigError, ConfigurationBuilder, Processor, Subject};
use std::time::Duration;

fn main() -> Result<(), ConfigError> {
    // Configuration is layered with clear precedence:
    // 1. Defaults (built-in sensible defaults)
    // 2. File configuration (TOML files, if present)
    // 3. Environment variables (RAVEN_* and the standard SENTRY_DSN / KEMAL_ENV)
    // 4. Programmatic configuration (code-level overrides)
    // A compile-time DSN sits below all of them.
    let builder = ConfigurationBuilder::new()
        .default_dsn(option_env!("SENTRY_DSN"))
        .with_file("./raven.toml")
        .with_env("RAVEN_")
        .with_standard_env()
        .environments(["production", "staging"])
        .read_timeout(Duration::from_secs(5))
        .add_excluded_exception("ArgumentError")
        .add_processor(Processor::Compact)
        .tag("team", "platform")
        .should_capture(|subject| subject.class_name() != Some("Timeout::Error"));

    // Extract settings for inspection (useful for debugging)
    let settings = builder.extract_settings()?;
    println!("Connect timeout: {:?}", settings.connect_timeout);
    println!("Read timeout: {:?}", settings.read_timeout);
    println!("Environments: {:?}", settings.environments);
    println!("Excluded exceptions: {:?}", settings.excluded_exceptions);

    let mut config = builder.build()?;

    let subject = Subject::exception("Timeout::Error", "upstream took too long");
    if !config.capture_allowed(Some(&subject)) {
        println!("Not sending: {}", config.error_messages());
    }

    Ok(())
}
