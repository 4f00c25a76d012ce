//! HTTP handlers.
//!
//! Handlers are thin: they move bytes between axum and the dispatcher. No
//! error formatting happens here.

pub mod rpc;
