use std::sync::Arc;

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};

use crate::{
    common::errors::ApiError,
    protocol::{IncomingEvent, Reply},
    server::AppState,
};

/// POST /v1/events
pub async fn handle_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IncomingEvent>, JsonRejection>,
) -> Result<Json<Vec<Reply>>, ApiError> {
    let Json(event) =
        payload.map_err(|e| ApiError::bad_request(e.body_text(), "/v1/events"))?;
    tracing::debug!("POST /v1/events from {}", event.sender());

    Ok(Json(state.resolver.handle(&event).await))
}
