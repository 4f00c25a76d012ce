//! Embedding entry point: configure, route actions, serve.
//!
//! ```ignore
//! let registry = ActionRegistry::builder()
//!     .action("DescribeZones", |_| Ok(serde_json::json!({ "zones": ["z1"] })))
//!     .build()?;
//! Api::new(ServerConfig::from_env()?).route(registry).serve().await?;
//! ```

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use actiongate_core::{ActionRegistry, DiagnosticSink};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::router::build_router;
use crate::state::AppState;

/// Builder tying a registry to the HTTP route.
pub struct Api {
    config: ServerConfig,
    sink: Option<Arc<dyn DiagnosticSink>>,
    state: Option<AppState>,
}

impl Api {
    pub fn new(config: ServerConfig) -> Self {
        Api {
            config,
            sink: None,
            state: None,
        }
    }

    /// Replaces the default `tracing` diagnostic sink. Call before `route`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Installs the action registry.
    pub fn route(mut self, registry: ActionRegistry) -> Self {
        let state = match &self.sink {
            Some(sink) => AppState::with_sink(registry, &self.config, sink.clone()),
            None => AppState::new(registry, &self.config),
        };
        tracing::info!(
            service = %self.config.name,
            actions = state.dispatcher.registry().len(),
            debug = self.config.debug,
            "actions routed"
        );
        self.state = Some(state);
        self
    }

    /// The assembled router, for serving or in-process testing.
    pub fn router(&self) -> Result<Router, ServerError> {
        let state = self.state.clone().ok_or(ServerError::NotRouted)?;
        Ok(build_router(state))
    }

    /// Binds `0.0.0.0:<port>` and serves until the process exits.
    pub async fn serve(self) -> Result<(), ServerError> {
        let app = self.router()?;
        let addr = format!("0.0.0.0:{}", self.config.port);
        tracing::info!("{} server starting on {}", self.config.name, addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}
