//! Shared application state for the HTTP server.
//!
//! [`AppState`] holds the dispatcher behind an `Arc`. The dispatcher is
//! immutable after startup, so no lock is needed: every request reads it
//! concurrently.

use std::sync::Arc;

use actiongate_core::{ActionRegistry, DiagnosticSink, Dispatcher};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    /// The dispatcher shared by all request tasks.
    pub dispatcher: Arc<Dispatcher>,
    /// Service name reported by the index route.
    pub name: Arc<str>,
}

impl AppState {
    /// Creates state whose diagnostics are recorded through `tracing`.
    pub fn new(registry: ActionRegistry, config: &ServerConfig) -> Self {
        let dispatcher = Dispatcher::new(Arc::new(registry), config.dispatch_config());
        Self::from_dispatcher(dispatcher, config)
    }

    /// Creates state with a custom diagnostic sink.
    pub fn with_sink(
        registry: ActionRegistry,
        config: &ServerConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let dispatcher =
            Dispatcher::with_sink(Arc::new(registry), config.dispatch_config(), sink);
        Self::from_dispatcher(dispatcher, config)
    }

    fn from_dispatcher(dispatcher: Dispatcher, config: &ServerConfig) -> Self {
        AppState {
            dispatcher: Arc::new(dispatcher),
            name: Arc::from(config.name.as_str()),
        }
    }
}
