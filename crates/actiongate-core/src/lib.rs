//! Core of the actiongate single-endpoint RPC dispatcher.
//!
//! Requests carry an `action` name plus parameters. The [`Dispatcher`] decodes
//! the request envelope, resolves the action in an [`ActionRegistry`], runs the
//! handler inside a [`GuardChain`], and encodes the outcome as a uniform
//! `{retCode, message, data}` [`ResponseEnvelope`].
//!
//! This crate is transport-free and fully synchronous. The HTTP glue lives in
//! `actiongate-server`.

pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod failure;
pub mod guard;
pub mod registry;
pub mod sink;

pub use config::DispatchConfig;
pub use dispatch::Dispatcher;
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use error::{ActionError, ConfigError, ResourceId};
pub use failure::{Failure, RetCode};
pub use guard::{Fault, Guard, GuardChain};
pub use registry::{ActionName, ActionRegistry, Handler, Params};
pub use sink::{DiagnosticSink, TracingSink};
