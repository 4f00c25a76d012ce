//! The dispatcher: envelope codec, registry lookup and guard chain behind a
//! single entry point.

use std::sync::Arc;

use crate::config::DispatchConfig;
use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::failure::{Failure, RetCode};
use crate::guard::{Fault, GuardChain};
use crate::registry::ActionRegistry;
use crate::sink::{DiagnosticSink, TracingSink};

/// Resolves and runs actions, always producing a [`ResponseEnvelope`].
///
/// Cheap to share: the registry is behind an `Arc` and nothing is mutated
/// during a dispatch.
pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    chain: GuardChain,
}

impl Dispatcher {
    /// Creates a dispatcher that records diagnostics through `tracing`.
    pub fn new(registry: Arc<ActionRegistry>, config: DispatchConfig) -> Self {
        Self::with_sink(registry, config, Arc::new(TracingSink))
    }

    pub fn with_sink(
        registry: Arc<ActionRegistry>,
        config: DispatchConfig,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Dispatcher {
            registry,
            chain: GuardChain::new(config, sink),
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Decodes `body`, runs the named action at most once, and encodes the
    /// result.
    pub fn dispatch(&self, body: &[u8]) -> ResponseEnvelope {
        let (action, result) = match RequestEnvelope::decode(body) {
            Err(err) => (None, self.chain.settle(Err(Fault::Raised(err)))),
            Ok(request) => {
                let result = match self.registry.get(request.action.as_str()) {
                    Some(handler) => self.chain.invoke(handler, &request.params),
                    None => Err(Failure::new(
                        RetCode::RequestParamUnknownAction,
                        format!("Unknow action {}.", request.action),
                    )),
                };
                (Some(request.action), result)
            }
        };

        let envelope = ResponseEnvelope::from(result);
        tracing::info!(
            action = action.as_ref().map(|a| a.as_str()).unwrap_or("-"),
            ret_code = envelope.ret_code.as_u32(),
            "user operation"
        );
        envelope
    }
}
