//! Logging Sink
//!
//! The cache logs only one thing: detected internal inconsistencies.

use tracing::warn;

use crate::error::CacheError;

// == Logger Trait ==
/// Receives reports of internal consistency violations.
pub trait Logger: Send + Sync {
    /// Called once per detected violation, before the cache heals itself.
    fn warning(&self, issue: &CacheError);
}

// == No-op Logger ==
/// Logger that drops every report. Used when none is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn warning(&self, _issue: &CacheError) {}
}

// == Tracing Logger ==
/// Forwards violations to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warning(&self, issue: &CacheError) {
        warn!(target: "ttlru", error = %issue, "cache consistency violation");
    }
}
