//! User-supplied callbacks.
//!
//! The configuration stores these as opaque strategies. Only
//! [`ShouldCapture`] is ever invoked by this crate, during
//! [`Configuration::capture_allowed`](crate::Configuration::capture_allowed).
//! The transport layer owns the calls to [`AsyncDispatch`] and
//! [`TransportFailureCallback`].
//!
//! # Example
//!
//! ```no_run
//! use raven_configuration::{ConfigurationBuilder, Subject};
//!
//! let config = ConfigurationBuilder::new()
//!     .should_capture(|subject: &Subject| match subject {
//!         Subject::Message(message) => !message.starts_with("healthcheck"),
//!         _ => true,
//!     })
//!     .async_dispatch(|event| {
//!         // Hand the event to a worker pool, background task, ...
//!         let _ = event;
//!     })
//!     .build()?;
//! # Ok::<(), raven_configuration::ConfigError>(())
//! ```

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The value a capture decision is made about.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    /// A plain message.
    Message(String),

    /// An exception, identified by its class name.
    Exception {
        /// Fully qualified exception class name.
        class_name: String,
        /// The exception message.
        message: String,
    },

    /// A fully assembled event payload.
    Event(Value),
}

impl Subject {
    /// Creates a message subject.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Creates an exception subject.
    pub fn exception(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Exception {
            class_name: class_name.into(),
            message: message.into(),
        }
    }

    /// Returns the exception class name, if this subject is an exception.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Exception { class_name, .. } => Some(class_name.as_str()),
            _ => None,
        }
    }
}

/// A shareable callback taking `&A` and returning `R`.
pub struct Callback<A: ?Sized, R> {
    f: Arc<dyn Fn(&A) -> R + Send + Sync>,
}

impl<A: ?Sized, R> Callback<A, R> {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Invokes the callback.
    pub fn call(&self, arg: &A) -> R {
        (self.f)(arg)
    }
}

impl<A: ?Sized, R> Clone for Callback<A, R> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A: ?Sized, R> fmt::Debug for Callback<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback(...)")
    }
}

/// Decides whether a message, exception or event should be sent.
///
/// Called with the subject passed to
/// [`Configuration::capture_allowed`](crate::Configuration::capture_allowed),
/// never without one. Returning `false` drops the event. The callback should
/// be free of side effects other than logging.
pub type ShouldCapture = Callback<Subject, bool>;

/// Sends an event outside the caller's thread.
///
/// Receives the serialised event. The transport invokes it from whatever
/// execution context it chooses; it must not block.
pub type AsyncDispatch = Callback<Value, ()>;

/// Notified with the event payload after the transport gives up on it.
pub type TransportFailureCallback = Callback<Value, ()>;
