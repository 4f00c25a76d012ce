//! Diagnostic sink for first-classified errors.
//!
//! Guards call [`DiagnosticSink::record`] exactly once per error they
//! classify (the provider guard records up to three separate facts).
//! Already-normalized failures are never recorded again.

/// Receives diagnostic text from the guard chain.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, text: &str);
}

/// Default sink forwarding diagnostics to `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, text: &str) {
        tracing::error!(target: "actiongate::diagnostic", "{}", text);
    }
}
