//! HTTP gateway (Axum) for report intake, match searches and match review.
//!
//! This module is primarily used by the `petradar` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{GatewayError, PETRADAR_ERROR_HEADER};
pub use handler::{
    CancelTaskResponse, FindMatchesResponse, PetReportRequest, PetReportResponse,
    StatusUpdateRequest, TaskStatusResponse, cancel_task_handler, get_match_handler,
    get_task_handler, register_found_pet_handler, register_lost_pet_handler,
    submit_find_matches_handler, update_match_status_handler,
};
pub use state::HandlerState;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/lost-pets", post(register_lost_pet_handler))
        .route("/v1/found-pets", post(register_found_pet_handler))
        .route(
            "/v1/found-pets/{found_pet_id}/matches",
            post(submit_find_matches_handler),
        )
        .route(
            "/v1/tasks/{task_id}",
            get(get_task_handler).delete(cancel_task_handler),
        )
        .route("/v1/matches/{match_id}", get(get_match_handler))
        .route(
            "/v1/matches/{match_id}/status",
            patch(update_match_status_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub tracked_tasks: usize,
    pub matches: usize,
}

#[tracing::instrument]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Reports `shutting_down` once the task registry has begun shutdown.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Json<ReadyResponse> {
    let status = if state.registry.is_shutdown_initiated() {
        "shutting_down"
    } else {
        "ok"
    };

    Json(ReadyResponse {
        status,
        tracked_tasks: state.registry.len(),
        matches: state.ledger.len(),
    })
}
