//! Logging trait for model service traffic and chat failures.
//!
//! This module provides the [`ClientLogger`] trait that captures requests,
//! streamed payloads, and the errors that the chat front-end swallows into a
//! static apology.  [`StderrLogger`] is a ready-made implementation that
//! writes one line per event to standard error.

use std::io::{self, Write};

use crate::Error;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// A trait for logging model service operations.
///
/// Every method has an empty default so implementors pick what they record.
///
/// # Example
///
/// ```rust,ignore
/// use edu_assistant::{ClientLogger, Error};
///
/// struct CountingLogger(std::sync::atomic::AtomicUsize);
///
/// impl ClientLogger for CountingLogger {
///     fn log_error(&self, _context: &str, _error: &Error) {
///         self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, _model: &str, _request: &GenerateContentRequest) {}

    /// Log one payload received on a response stream.
    fn log_stream_response(&self, _response: &GenerateContentResponse) {}

    /// Log a failure.  `context` names the operation that failed.
    fn log_error(&self, _context: &str, _error: &Error) {}
}

/// Logger that writes a line per event to standard error.
#[derive(Debug, Clone, Default)]
pub struct StderrLogger {
    /// Also log requests and payloads, not only errors.
    pub verbose: bool,
}

impl StderrLogger {
    /// Creates a logger that only reports errors.
    pub fn errors_only() -> Self {
        Self { verbose: false }
    }

    /// Creates a logger that reports traffic as well as errors.
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl ClientLogger for StderrLogger {
    fn log_request(&self, model: &str, request: &GenerateContentRequest) {
        if self.verbose {
            let _ = writeln!(
                io::stderr(),
                "[request] model={model} turns={}",
                request.contents.len()
            );
        }
    }

    fn log_stream_response(&self, response: &GenerateContentResponse) {
        if self.verbose {
            let _ = writeln!(io::stderr(), "[chunk] {:?}", response.text());
        }
    }

    fn log_error(&self, context: &str, error: &Error) {
        let _ = writeln!(io::stderr(), "[error] {context}: {error}");
    }
}
