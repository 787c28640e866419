//! Diagnostic sink
//!
//! Per-chunk and per-tag failures never reach the caller as an error (see
//! [`crate::core::error`]); they are downgraded instead. A pluggable sink is
//! how a caller can still observe them, without the crate committing to any
//! particular logging framework or writing to a fixed stream.

use crate::core::error::XmpError;

/// Receives diagnostics for conditions the reader recovered from.
///
/// Implement this to route XMP-reading diagnostics into an application's
/// own telemetry; the default [`LogSink`] is usually enough.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, context: &str, error: &XmpError);
}

/// Default sink: forwards every diagnostic to the `log` facade at `warn`
/// level, tagged with the stage that produced it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&self, context: &str, error: &XmpError) {
        log::warn!("xmp: {context}: {error}");
    }
}

/// Sink that discards every diagnostic. Useful for callers that have
/// already decided they don't care, without paying even a `log::warn!`
/// filter check.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn warn(&self, _context: &str, _error: &XmpError) {}
}
