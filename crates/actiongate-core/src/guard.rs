//! Guard chain: translation of handler errors into normalized failures.
//!
//! A handler outcome flows through the guards innermost-first:
//!
//! | Guard              | Catches                                | Code                          |
//! |--------------------|----------------------------------------|-------------------------------|
//! | [`ProviderGuard`]  | `ProviderAction`                       | `ProviderError`               |
//! | [`ParamsGuard`]    | `Validation`                           | `RequestParamValidationError` |
//! | [`ParamsGuard`]    | `InvalidRequestParameter`              | `RequestParamUnknownAction`   |
//! | [`ResourceGuard`]  | resource kinds (`ResourceIsBusy` remapped to forbidden) | matching resource code |
//! | [`GenericGuard`]   | anything still raised                  | `ServerError`                 |
//!
//! Each guard only touches [`Fault::Raised`] values in its own subset. Once a
//! fault is [`Fault::Normalized`] it passes through every outer guard
//! unchanged and is not recorded again.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::DispatchConfig;
use crate::error::ActionError;
use crate::failure::{Failure, RetCode, EXCEPTION_STR, RESOURCE_ID};
use crate::registry::{Handler, Params};
use crate::sink::DiagnosticSink;

/// Message returned for every provider failure; details stay in the log.
pub const PROVIDER_FAILURE_MESSAGE: &str = "Action failed.op";

/// A failed outcome as it travels through the chain.
#[derive(Debug)]
pub enum Fault {
    /// Not yet classified by any guard.
    Raised(ActionError),
    /// Classified and final.
    Normalized(Failure),
}

impl From<ActionError> for Fault {
    fn from(err: ActionError) -> Self {
        Fault::Raised(err)
    }
}

impl From<Failure> for Fault {
    fn from(failure: Failure) -> Self {
        Fault::Normalized(failure)
    }
}

/// Outcome of a handler as seen by the guards.
pub type Outcome = Result<Value, Fault>;

/// One translation layer of the chain.
pub trait Guard: Send + Sync {
    fn name(&self) -> &'static str;

    /// Translates the faults this guard owns and passes everything else on.
    fn apply(&self, outcome: Outcome) -> Outcome;
}

/// Shared state every guard needs to build a failure.
#[derive(Clone)]
struct Reporter {
    debug: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Reporter {
    /// Diagnostic text describing `err`, recorded once.
    fn record(&self, err: &ActionError) -> String {
        let text = format!("{:?}", err);
        self.sink.record(&text);
        text
    }

    fn data(&self, diagnostic: String) -> Map<String, Value> {
        let mut data = Map::new();
        if self.debug {
            data.insert(EXCEPTION_STR.to_string(), Value::String(diagnostic));
        }
        data
    }
}

/// Handles [`ActionError::ProviderAction`].
pub struct ProviderGuard {
    reporter: Reporter,
}

impl Guard for ProviderGuard {
    fn name(&self) -> &'static str {
        "provider"
    }

    fn apply(&self, outcome: Outcome) -> Outcome {
        match outcome {
            Err(Fault::Raised(err @ ActionError::ProviderAction { .. })) => {
                if let ActionError::ProviderAction {
                    message,
                    exception,
                    stacktrace,
                } = &err
                {
                    if let Some(stacktrace) = stacktrace {
                        self.reporter.sink.record(stacktrace);
                    }
                    if let Some(exception) = exception {
                        self.reporter.sink.record(exception);
                    }
                    self.reporter.sink.record(message);
                }
                // Carries exception and stacktrace; attached only in debug mode.
                let data = self.reporter.data(format!("{:?}", err));
                Err(Failure::with_data(RetCode::ProviderError, PROVIDER_FAILURE_MESSAGE, data)
                    .into())
            }
            other => other,
        }
    }
}

/// Handles request parameter errors.
pub struct ParamsGuard {
    reporter: Reporter,
}

impl Guard for ParamsGuard {
    fn name(&self) -> &'static str {
        "params"
    }

    fn apply(&self, outcome: Outcome) -> Outcome {
        let (code, message, err) = match outcome {
            Err(Fault::Raised(err @ ActionError::Validation { .. })) => (
                RetCode::RequestParamValidationError,
                format!("Illegal request format, {}.", err),
                err,
            ),
            Err(Fault::Raised(err @ ActionError::InvalidRequestParameter { .. })) => {
                (RetCode::RequestParamUnknownAction, err.to_string(), err)
            }
            other => return other,
        };
        let data = self.reporter.data(self.reporter.record(&err));
        Err(Failure::with_data(code, message, data).into())
    }
}

/// Handles resource-scoped errors. The resource id is always disclosed.
pub struct ResourceGuard {
    reporter: Reporter,
}

impl ResourceGuard {
    fn code_for(err: &ActionError) -> Option<RetCode> {
        match err {
            ActionError::ResourceNotFound { .. } => Some(RetCode::ResourceNotFound),
            ActionError::ResourceNotBelongsToProject { .. } => {
                Some(RetCode::ResourceNotBelongsToProject)
            }
            ActionError::ResourceActionForbidden { .. } | ActionError::ResourceIsBusy { .. } => {
                Some(RetCode::ResourceActionForbidden)
            }
            ActionError::ResourceActionUnsupported { .. } => {
                Some(RetCode::ResourceActionUnsupported)
            }
            _ => None,
        }
    }
}

impl Guard for ResourceGuard {
    fn name(&self) -> &'static str {
        "resource"
    }

    fn apply(&self, outcome: Outcome) -> Outcome {
        let err = match outcome {
            Err(Fault::Raised(err)) => err,
            other => return other,
        };
        let Some(code) = Self::code_for(&err) else {
            return Err(Fault::Raised(err));
        };
        let resource_id = err
            .resource_id()
            .and_then(|id| serde_json::to_value(id).ok())
            .unwrap_or(Value::Null);

        let mut data = self.reporter.data(self.reporter.record(&err));
        data.insert(RESOURCE_ID.to_string(), resource_id);
        Err(Failure::with_data(code, err.to_string(), data).into())
    }
}

/// The outermost fence.
///
/// Normalized failures pass through silently; anything still raised is an
/// unclassified bug and becomes a [`RetCode::ServerError`].
pub struct GenericGuard {
    reporter: Reporter,
}

impl GenericGuard {
    pub fn seal(&self, outcome: Outcome) -> Result<Value, Failure> {
        match outcome {
            Ok(value) => Ok(value),
            Err(Fault::Normalized(failure)) => Err(failure),
            Err(Fault::Raised(err)) => {
                let data = self.reporter.data(self.reporter.record(&err));
                Err(Failure::with_data(RetCode::ServerError, err.to_string(), data))
            }
        }
    }
}

/// The fixed guard sequence wrapped around every handler call.
pub struct GuardChain {
    guards: Vec<Box<dyn Guard>>,
    fence: GenericGuard,
}

impl GuardChain {
    /// Builds provider, params and resource guards (innermost first) inside
    /// the generic fence.
    pub fn new(config: DispatchConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        let reporter = Reporter {
            debug: config.debug,
            sink,
        };
        GuardChain {
            guards: vec![
                Box::new(ProviderGuard {
                    reporter: reporter.clone(),
                }),
                Box::new(ParamsGuard {
                    reporter: reporter.clone(),
                }),
                Box::new(ResourceGuard {
                    reporter: reporter.clone(),
                }),
            ],
            fence: GenericGuard { reporter },
        }
    }

    /// Names of the translating guards, innermost first.
    pub fn guard_names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    /// Threads an outcome through every guard and the fence.
    pub fn settle(&self, outcome: Outcome) -> Result<Value, Failure> {
        let outcome = self
            .guards
            .iter()
            .fold(outcome, |outcome, guard| guard.apply(outcome));
        self.fence.seal(outcome)
    }

    /// Calls `handler` exactly once and settles its outcome.
    ///
    /// A panicking handler is treated as an unclassified error.
    pub fn invoke(&self, handler: &Handler, params: &Params) -> Result<Value, Failure> {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| handler(params))) {
            Ok(result) => result.map_err(Fault::Raised),
            Err(payload) => Err(Fault::Raised(ActionError::generic(format!(
                "handler panicked: {}",
                panic_message(payload.as_ref())
            )))),
        };
        self.settle(outcome)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::testing::RecordingSink;
    use serde_json::json;

    fn chain(debug: bool) -> (GuardChain, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let chain = GuardChain::new(DispatchConfig { debug }, sink.clone());
        (chain, sink)
    }

    fn raise(err: ActionError) -> Outcome {
        Err(Fault::Raised(err))
    }

    #[test]
    fn guards_are_ordered_innermost_first() {
        let (chain, _) = chain(false);
        assert_eq!(chain.guard_names(), vec!["provider", "params", "resource"]);
    }

    #[test]
    fn success_passes_through_untouched() {
        let (chain, sink) = chain(true);
        assert_eq!(chain.settle(Ok(json!({"k": 1}))).unwrap(), json!({"k": 1}));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn provider_failure_records_each_fact_and_hides_details() {
        let (chain, sink) = chain(false);
        let failure = chain
            .settle(raise(ActionError::provider(
                "inner message",
                Some("ex".into()),
                Some("stack".into()),
            )))
            .unwrap_err();

        assert_eq!(failure.code(), RetCode::ProviderError);
        assert_eq!(failure.message(), PROVIDER_FAILURE_MESSAGE);
        assert!(failure.data().is_empty());
        assert_eq!(sink.lines(), vec!["stack", "ex", "inner message"]);
    }

    #[test]
    fn provider_failure_skips_absent_facts() {
        let (chain, sink) = chain(true);
        let failure = chain
            .settle(raise(ActionError::provider("only message", None, None)))
            .unwrap_err();
        assert_eq!(sink.lines(), vec!["only message"]);
        assert!(failure.data()[EXCEPTION_STR]
            .as_str()
            .unwrap()
            .contains("only message"));
    }

    #[test]
    fn validation_message_is_prefixed() {
        let (chain, sink) = chain(false);
        let failure = chain
            .settle(raise(ActionError::validation("limit must be positive")))
            .unwrap_err();
        assert_eq!(failure.code(), RetCode::RequestParamValidationError);
        assert_eq!(
            failure.message(),
            "Illegal request format, limit must be positive."
        );
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn invalid_parameter_maps_to_unknown_action_code() {
        let (chain, _) = chain(false);
        let failure = chain
            .settle(raise(ActionError::invalid_parameter("bad zone")))
            .unwrap_err();
        assert_eq!(failure.code(), RetCode::RequestParamUnknownAction);
        assert_eq!(failure.message(), "bad zone");
    }

    #[test]
    fn resource_id_is_disclosed_without_debug() {
        let (chain, _) = chain(false);
        let failure = chain.settle(raise(ActionError::not_found(1))).unwrap_err();
        assert_eq!(failure.code(), RetCode::ResourceNotFound);
        assert_eq!(failure.data().get(RESOURCE_ID), Some(&json!(1)));
        assert!(!failure.data().contains_key(EXCEPTION_STR));
    }

    #[test]
    fn busy_is_remapped_to_forbidden() {
        let (chain, _) = chain(false);
        let busy = chain.settle(raise(ActionError::busy("i-1"))).unwrap_err();
        let forbidden = chain.settle(raise(ActionError::forbidden("i-1"))).unwrap_err();
        assert_eq!(busy.code(), RetCode::ResourceActionForbidden);
        assert_eq!(busy.code(), forbidden.code());
        assert_eq!(busy.data().get(RESOURCE_ID), Some(&json!("i-1")));
    }

    #[test]
    fn normalized_failure_is_not_rewritten_or_recorded() {
        let (chain, sink) = chain(true);
        let original = Failure::new(RetCode::RequestParamUnknownAction, "Unknow action X.");
        let settled = chain
            .settle(Err(Fault::Normalized(original.clone())))
            .unwrap_err();
        assert_eq!(settled, original);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn generic_errors_become_server_errors() {
        let (chain, sink) = chain(true);
        let failure = chain.settle(raise(ActionError::generic("boom"))).unwrap_err();
        assert_eq!(failure.code(), RetCode::ServerError);
        assert_eq!(failure.message(), "boom");
        assert!(failure.data()[EXCEPTION_STR].as_str().unwrap().contains("boom"));
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn panicking_handler_is_fenced() {
        let (chain, sink) = chain(false);
        let handler: Handler = Arc::new(|_: &Params| -> Result<Value, ActionError> {
            panic!("index out of range")
        });
        let failure = chain.invoke(&handler, &Params::default()).unwrap_err();
        assert_eq!(failure.code(), RetCode::ServerError);
        assert!(failure.message().contains("index out of range"));
        assert_eq!(sink.lines().len(), 1);
    }
}
