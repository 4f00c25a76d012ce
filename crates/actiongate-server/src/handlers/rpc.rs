//! Handlers for the single RPC route.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use actiongate_core::{Failure, ResponseEnvelope, RetCode};

use crate::state::AppState;

/// Identifies the service.
///
/// `GET /`
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("It's {} API service.\n", state.name),
    )
}

/// Dispatches an action.
///
/// `POST /`
///
/// The body is taken raw so that missing or malformed JSON is reported
/// in-band. Handlers are synchronous and may block, so dispatch runs on the
/// blocking pool. The response is always HTTP 200.
pub async fn call(State(state): State<AppState>, body: Bytes) -> Json<ResponseEnvelope> {
    let dispatcher = state.dispatcher.clone();
    let envelope = match tokio::task::spawn_blocking(move || dispatcher.dispatch(&body)).await {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::error!("dispatch task failed: {}", err);
            ResponseEnvelope::failure(Failure::new(RetCode::ServerError, err.to_string()))
        }
    };
    Json(envelope)
}
