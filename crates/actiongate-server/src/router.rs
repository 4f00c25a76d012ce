//! Router assembly for the actiongate HTTP API.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the single-route router.
///
/// `GET /` identifies the service; `POST /` dispatches an action.
/// The body limit is lifted so oversized requests still reach the dispatcher
/// and get an in-band envelope. TraceLayer provides request-level logging.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::rpc::index).post(handlers::rpc::call),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
