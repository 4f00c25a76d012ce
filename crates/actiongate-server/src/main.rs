//! Binary entrypoint for the actiongate HTTP server.
//!
//! Reads configuration from environment variables (see [`ServerConfig`]):
//! - `ACTIONGATE_NAME`: service name (default: "actiongate")
//! - `ACTIONGATE_PORT`: server listen port (default: "3000")
//! - `ACTIONGATE_DEBUG`: attach diagnostics to failures (default: "false")
//!
//! Serves a small demo registry; embedding applications build their own
//! registry and call [`Api`] directly.

use std::process;

use serde::Deserialize;
use serde_json::json;

use actiongate_core::{ActionError, ActionRegistry, ConfigError, Params};
use actiongate_server::{Api, ServerConfig};

#[derive(Deserialize)]
struct EchoRequest {
    text: String,
}

fn demo_registry() -> Result<ActionRegistry, ConfigError> {
    ActionRegistry::builder()
        .action("Ping", |_| Ok(json!({ "pong": true })))
        .action("Echo", |params: &Params| {
            let req: EchoRequest = params.parse()?;
            Ok(json!({ "text": req.text }))
        })
        .action("DescribeResource", |params: &Params| -> Result<serde_json::Value, ActionError> {
            let id = params.get_str("resourceId")?;
            Err(ActionError::not_found(id))
        })
        .build()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{}", err);
            process::exit(2);
        }
    };

    let registry = match demo_registry() {
        Ok(registry) => registry,
        Err(err) => {
            tracing::error!("{}", err);
            process::exit(2);
        }
    };

    if let Err(err) = Api::new(config).route(registry).serve().await {
        tracing::error!("{}", err);
        process::exit(1);
    }
}
