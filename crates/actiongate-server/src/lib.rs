//! HTTP transport for the actiongate dispatcher.
//!
//! Exposes one route: `GET /` answers with a plain-text identification
//! string, `POST /` hands the raw body to [`actiongate_core::Dispatcher`] and
//! always answers HTTP 200 with the `{retCode, message, data}` envelope.

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use api::Api;
pub use config::ServerConfig;
pub use error::ServerError;
