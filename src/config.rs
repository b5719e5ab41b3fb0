//! Configuration types for the error-reporting client.
//!
//! [`Settings`] holds every tunable that can be expressed as data. It is
//! designed to be deserialised from multiple sources using figment,
//! supporting layered configuration from defaults, files, and environment
//! variables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Location of the Heroku dyno metadata file.
pub const HEROKU_DYNO_METADATA: &str = "/etc/heroku/dyno";

/// Directories under the project root whose frames count as application code.
pub const DEFAULT_APP_DIRS_PATTERN: &str = "(bin|exe|app|config|lib|spec|src)";

/// Exception classes that are never sent unless removed explicitly.
pub const DEFAULT_EXCLUDED_EXCEPTIONS: &[&str] = &["Kemal::Exceptions::RouteNotFound"];

/// Processors applied to every event, in order.
///
/// Circular references must be removed before anything walks the payload,
/// and compaction runs last.
pub const DEFAULT_PROCESSORS: &[Processor] = &[
    Processor::RemoveCircularReferences,
    Processor::Utf8Conversion,
    Processor::SanitizeData,
    Processor::Cookies,
    Processor::PostData,
    Processor::HttpHeaders,
    Processor::Compact,
];

/// Event processors run by the transport before an event is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Processor {
    /// Replaces self-referencing structures with a placeholder.
    RemoveCircularReferences,
    /// Converts strings to valid UTF-8.
    #[serde(alias = "utf-8-conversion")]
    Utf8Conversion,
    /// Masks values of sensitive fields and credit card numbers.
    SanitizeData,
    /// Strips cookies from request data.
    Cookies,
    /// Strips POST bodies from request data.
    PostData,
    /// Masks sensitive HTTP headers.
    HttpHeaders,
    /// Drops empty values from the payload.
    Compact,
}

/// Payload encoding used by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Gzip-compressed JSON.
    #[default]
    Gzip,
    /// Plain JSON.
    Json,
}

/// Every data-only tunable of a [`Configuration`](crate::Configuration).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Connection string for the reporting endpoint.
    pub dsn: Option<String>,

    /// Environments events are sent from. Empty means all environments.
    pub environments: Vec<String>,

    /// The environment this process runs in.
    pub current_environment: Option<String>,

    /// Release identifier. Detected when unset.
    pub release: Option<String>,

    /// Server name attached to events. Resolved from the host when unset.
    pub server_name: Option<String>,

    /// Root of the application. Defaults to the working directory.
    pub project_root: Option<PathBuf>,

    /// Regex alternation of application directories below the project root.
    pub app_dirs_pattern: String,

    /// Transport connect timeout.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Transport read timeout.
    #[serde(with = "humantime_serde")]
    pub read_timeout: Duration,

    /// Payload encoding.
    pub encoding: Encoding,

    /// Processors applied to events, in order.
    pub processors: Vec<Processor>,

    /// Whether credit card numbers are masked.
    pub sanitize_credit_cards: bool,

    /// Additional field names whose values are masked.
    pub sanitize_fields: Vec<String>,

    /// Additional HTTP header names whose values are masked.
    pub sanitize_http_headers: Vec<String>,

    /// Exception class names that are never sent.
    pub excluded_exceptions: Vec<String>,

    /// Suppresses the "ready to send events" log line.
    pub silence_ready: bool,

    /// Lines of source context around each frame.
    pub context_lines: Option<u32>,

    /// Whether the transport verifies TLS certificates.
    pub ssl_verification: bool,

    /// HTTP proxy used by the transport.
    pub proxy: Option<String>,

    /// Tags added to every event.
    pub tags: HashMap<String, String>,

    /// Path of the platform metadata file consulted during release detection.
    pub platform_metadata_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dsn: None,
            environments: Vec::new(),
            current_environment: None,
            release: None,
            server_name: None,
            project_root: None,
            app_dirs_pattern: DEFAULT_APP_DIRS_PATTERN.to_string(),
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(2),
            encoding: Encoding::default(),
            processors: DEFAULT_PROCESSORS.to_vec(),
            sanitize_credit_cards: true,
            sanitize_fields: Vec::new(),
            sanitize_http_headers: Vec::new(),
            excluded_exceptions: DEFAULT_EXCLUDED_EXCEPTIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            silence_ready: false,
            context_lines: Some(3),
            ssl_verification: true,
            proxy: None,
            tags: HashMap::new(),
            platform_metadata_path: PathBuf::from(HEROKU_DYNO_METADATA),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.dsn, None);
        assert!(settings.environments.is_empty());
        assert_eq!(settings.connect_timeout, Duration::from_secs(1));
        assert_eq!(settings.read_timeout, Duration::from_secs(2));
        assert_eq!(settings.encoding, Encoding::Gzip);
        assert!(settings.sanitize_credit_cards);
        assert!(settings.ssl_verification);
        assert_eq!(
            settings.platform_metadata_path,
            PathBuf::from("/etc/heroku/dyno")
        );
    }

    #[test]
    fn circular_references_removed_before_compaction() {
        let processors = Settings::default().processors;
        let remove = processors
            .iter()
            .position(|p| *p == Processor::RemoveCircularReferences)
            .unwrap();
        let compact = processors
            .iter()
            .position(|p| *p == Processor::Compact)
            .unwrap();
        assert!(remove < compact);
        assert_eq!(processors.last(), Some(&Processor::Compact));
    }

    #[test]
    fn test_processor_serde_names() {
        let json = serde_json::to_string(&Processor::RemoveCircularReferences).unwrap();
        assert_eq!(json, "\"remove_circular_references\"");

        let parsed: Processor = serde_json::from_str("\"utf-8-conversion\"").unwrap();
        assert_eq!(parsed, Processor::Utf8Conversion);
    }

    #[test]
    fn test_settings_deserialise_durations() {
        let settings: Settings =
            serde_json::from_str(r#"{"connect_timeout": "500ms", "read_timeout": "5s"}"#).unwrap();
        assert_eq!(settings.connect_timeout, Duration::from_millis(500));
        assert_eq!(settings.read_timeout, Duration::from_secs(5));
        assert_eq!(settings.processors, DEFAULT_PROCESSORS);
    }
}
