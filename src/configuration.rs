//! The runtime configuration aggregate.
//!
//! A [`Configuration`] is assembled once per process, normally through
//! [`ConfigurationBuilder`](crate::ConfigurationBuilder), and may be mutated
//! freely before the first event is captured.

use crate::callbacks::{AsyncDispatch, Callback, ShouldCapture, Subject, TransportFailureCallback};
use crate::config::{Encoding, Processor, Settings};
use crate::dsn::Dsn;
use crate::logger::{Logger, TracingLogger};
use crate::release::{CommandRunner, ReleaseDetector};
use crate::server_name::resolve_server_name;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use url::Url;

/// Complete configuration of the error-reporting client.
///
/// DSN components are private so that the derived
/// [`server`](Self::server) stays consistent with them. Plain tunables are
/// public fields.
pub struct Configuration {
    dsn: Dsn,

    /// Environments events are sent from. Empty means all environments.
    pub environments: Vec<String>,

    /// The environment this process runs in.
    pub current_environment: Option<String>,

    /// Release identifier attached to events.
    pub release: Option<String>,

    /// Server name attached to events.
    pub server_name: Option<String>,

    /// Transport connect timeout. Not enforced by this crate.
    pub connect_timeout: Duration,

    /// Transport read timeout. Not enforced by this crate.
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

    project_root: OnceLock<PathBuf>,
    app_dirs_pattern: String,
    in_app_pattern: OnceLock<Option<Regex>>,

    logger: Arc<dyn Logger>,
    should_capture: Option<ShouldCapture>,
    async_dispatch: Option<AsyncDispatch>,
    transport_failure_callback: Option<TransportFailureCallback>,

    pub(crate) errors: Vec<String>,
}

impl Configuration {
    /// Assembles a configuration from extracted settings.
    ///
    /// The release and server name are detected unless `settings` already
    /// carries them. Detection runs `runner` at most twice and reads a few
    /// files below the project root; none of it can fail.
    pub fn from_settings(
        settings: Settings,
        runner: &dyn CommandRunner,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let mut processors = Vec::with_capacity(settings.processors.len());
        for processor in settings.processors {
            if !processors.contains(&processor) {
                processors.push(processor);
            }
        }

        let mut config = Self {
            dsn: Dsn::default(),
            environments: settings.environments,
            current_environment: settings.current_environment,
            release: None,
            server_name: None,
            connect_timeout: settings.connect_timeout,
            read_timeout: settings.read_timeout,
            encoding: settings.encoding,
            processors,
            sanitize_credit_cards: settings.sanitize_credit_cards,
            sanitize_fields: settings.sanitize_fields,
            sanitize_http_headers: settings.sanitize_http_headers,
            excluded_exceptions: settings.excluded_exceptions,
            silence_ready: settings.silence_ready,
            context_lines: settings.context_lines,
            ssl_verification: settings.ssl_verification,
            proxy: settings.proxy,
            tags: settings.tags,
            project_root: settings
                .project_root
                .map(OnceLock::from)
                .unwrap_or_default(),
            app_dirs_pattern: settings.app_dirs_pattern,
            in_app_pattern: OnceLock::new(),
            logger,
            should_capture: None,
            async_dispatch: None,
            transport_failure_callback: None,
            errors: Vec::new(),
        };

        if let Some(dsn) = settings.dsn.as_deref() {
            config.set_dsn(dsn);
        }

        config.release = settings.release.or_else(|| {
            ReleaseDetector::new(
                runner,
                config.logger.as_ref(),
                config.project_root(),
                &settings.platform_metadata_path,
            )
            .detect()
        });
        config.server_name = settings
            .server_name
            .or_else(|| resolve_server_name(runner));

        config
    }

    /// Parses `dsn` and replaces every DSN-derived component.
    ///
    /// A malformed DSN is logged. Its well-formed components are kept and
    /// the rest are left unset.
    pub fn set_dsn(&mut self, dsn: &str) {
        self.dsn = match Dsn::parse(dsn) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(target: "raven", error = %e, "Malformed DSN, keeping readable components");
                Dsn::parse_lossy(dsn)
            }
        };
    }

    /// Replaces every DSN-derived component from an already parsed URI.
    pub fn set_dsn_url(&mut self, url: &Url) {
        self.dsn = Dsn::from_url(url);
    }

    /// Returns the parsed DSN components.
    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }

    /// Returns `scheme://host[:port][path]`, derived from the DSN.
    pub fn server(&self) -> Option<String> {
        self.dsn.server()
    }

    /// Returns the URI scheme.
    pub fn scheme(&self) -> Option<&str> {
        self.dsn.scheme()
    }

    /// Returns the endpoint host.
    pub fn host(&self) -> Option<&str> {
        self.dsn.host()
    }

    /// Returns the endpoint port, absent for the scheme's well-known port.
    pub fn port(&self) -> Option<u16> {
        self.dsn.port()
    }

    /// Returns the endpoint path prefix.
    pub fn path(&self) -> Option<&str> {
        self.dsn.path()
    }

    /// Returns the public key.
    pub fn public_key(&self) -> Option<&str> {
        self.dsn.public_key()
    }

    /// Returns the secret key.
    pub fn secret_key(&self) -> Option<&str> {
        self.dsn.secret_key()
    }

    /// Returns the project id.
    pub fn project_id(&self) -> Option<u64> {
        self.dsn.project_id()
    }

    /// Sets the URI scheme.
    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.dsn.set_scheme(Some(scheme.into()));
    }

    /// Sets the endpoint host.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.dsn.set_host(Some(host.into()));
    }

    /// Sets the endpoint port.
    pub fn set_port(&mut self, port: Option<u16>) {
        self.dsn.set_port(port);
    }

    /// Sets the endpoint path prefix.
    pub fn set_path(&mut self, path: Option<String>) {
        self.dsn.set_path(path);
    }

    /// Sets the public key.
    pub fn set_public_key(&mut self, public_key: Option<String>) {
        self.dsn.set_public_key(public_key);
    }

    /// Sets the secret key.
    pub fn set_secret_key(&mut self, secret_key: Option<String>) {
        self.dsn.set_secret_key(secret_key);
    }

    /// Sets the project id.
    pub fn set_project_id(&mut self, project_id: Option<u64>) {
        self.dsn.set_project_id(project_id);
    }

    /// Returns the project root, defaulting to the working directory.
    ///
    /// Computed on first access and cached.
    pub fn project_root(&self) -> &Path {
        self.project_root.get_or_init(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
    }

    /// Sets the project root and discards the cached in-app pattern.
    pub fn set_project_root(&mut self, root: impl Into<PathBuf>) {
        self.project_root = OnceLock::from(root.into());
        self.in_app_pattern = OnceLock::new();
    }

    /// Returns the application directory pattern.
    pub fn app_dirs_pattern(&self) -> &str {
        &self.app_dirs_pattern
    }

    /// Sets the application directory pattern and discards the cached
    /// in-app pattern.
    pub fn set_app_dirs_pattern(&mut self, pattern: impl Into<String>) {
        self.app_dirs_pattern = pattern.into();
        self.in_app_pattern = OnceLock::new();
    }

    /// Returns the regex matching frame paths that belong to the application.
    ///
    /// Compiled on first access. `None` if the application directory
    /// pattern is not a valid regex.
    pub fn in_app_pattern(&self) -> Option<&Regex> {
        self.in_app_pattern
            .get_or_init(|| {
                let root = regex::escape(&self.project_root().to_string_lossy());
                let pattern = format!("^({root}/)?{}", self.app_dirs_pattern);
                match Regex::new(&pattern) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        tracing::warn!(target: "raven", error = %e, "Invalid app_dirs_pattern");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Returns the logger collaborator.
    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// Replaces the logger collaborator.
    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    /// Returns the capture predicate.
    pub fn should_capture(&self) -> Option<&ShouldCapture> {
        self.should_capture.as_ref()
    }

    /// Sets the predicate consulted by
    /// [`capture_allowed`](Self::capture_allowed).
    pub fn set_should_capture<F>(&mut self, f: F)
    where
        F: Fn(&Subject) -> bool + Send + Sync + 'static,
    {
        self.should_capture = Some(Callback::new(f));
    }

    /// Removes the capture predicate.
    pub fn clear_should_capture(&mut self) {
        self.should_capture = None;
    }

    /// Returns the asynchronous dispatch hook.
    pub fn async_dispatch(&self) -> Option<&AsyncDispatch> {
        self.async_dispatch.as_ref()
    }

    /// Sets the asynchronous dispatch hook.
    pub fn set_async_dispatch<F>(&mut self, f: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.async_dispatch = Some(Callback::new(f));
    }

    /// Returns the transport failure callback.
    pub fn transport_failure_callback(&self) -> Option<&TransportFailureCallback> {
        self.transport_failure_callback.as_ref()
    }

    /// Sets the transport failure callback.
    pub fn set_transport_failure_callback<F>(&mut self, f: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.transport_failure_callback = Some(Callback::new(f));
    }

    pub(crate) fn set_callbacks(
        &mut self,
        should_capture: Option<ShouldCapture>,
        async_dispatch: Option<AsyncDispatch>,
        transport_failure_callback: Option<TransportFailureCallback>,
    ) {
        self.should_capture = should_capture;
        self.async_dispatch = async_dispatch;
        self.transport_failure_callback = transport_failure_callback;
    }

    /// Appends a processor unless it is already configured.
    pub fn add_processor(&mut self, processor: Processor) {
        if !self.processors.contains(&processor) {
            self.processors.push(processor);
        }
    }

    /// Removes a processor.
    pub fn remove_processor(&mut self, processor: Processor) {
        self.processors.retain(|p| *p != processor);
    }

    /// Adds an exception class name that is never sent.
    pub fn add_excluded_exception(&mut self, class_name: impl Into<String>) {
        push_unique(&mut self.excluded_exceptions, class_name.into());
    }

    /// Adds a field name whose values are masked.
    pub fn add_sanitize_field(&mut self, field: impl Into<String>) {
        push_unique(&mut self.sanitize_fields, field.into());
    }

    /// Adds an HTTP header name whose values are masked.
    pub fn add_sanitize_http_header(&mut self, header: impl Into<String>) {
        push_unique(&mut self.sanitize_http_headers, header.into());
    }
}

impl Default for Configuration {
    /// Default settings, release and server name detected from the system.
    fn default() -> Self {
        Self::from_settings(
            Settings::default(),
            &crate::release::SystemCommandRunner,
            Arc::new(TracingLogger),
        )
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("dsn", &self.dsn)
            .field("server", &self.server())
            .field("environments", &self.environments)
            .field("current_environment", &self.current_environment)
            .field("release", &self.release)
            .field("server_name", &self.server_name)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("encoding", &self.encoding)
            .field("processors", &self.processors)
            .field("excluded_exceptions", &self.excluded_exceptions)
            .field("project_root", &self.project_root.get())
            .field("should_capture", &self.should_capture)
            .field("async_dispatch", &self.async_dispatch)
            .field("transport_failure_callback", &self.transport_failure_callback)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
