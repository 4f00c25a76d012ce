//! Startup errors for the server.
//!
//! Request-time failures never surface here: they are encoded in-band by the
//! dispatcher and always travel as HTTP 200.

use actiongate_core::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid registry or environment configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `serve` was called before any actions were routed.
    #[error("no actions routed; call Api::route before serving")]
    NotRouted,

    /// Binding or serving the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
