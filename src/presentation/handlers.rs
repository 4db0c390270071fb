// HTTP request handlers
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SelectionRequest {
    /// Row index into the chart's rendered view
    pub row: usize,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current rendered chart payloads for the host page
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.snapshots().await)
}

/// Active cross-chart selections, keyed by column id
pub async fn get_filters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.filters().clone())
}

/// A chart raised a selection
pub async fn select_value(
    Path(container_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    match dashboard.select(&container_id, request.row).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("selection on '{}' failed: {}", container_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// A chart's selection was cleared
pub async fn clear_selection(
    Path(container_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mut dashboard = state.dashboard.lock().await;
    match dashboard.deselect(&container_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("deselection on '{}' failed: {}", container_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
