use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::GatewayError;
use super::state::HandlerState;
use crate::ledger::{MatchRecord, MatchStatus};
use crate::model::{Attributes, Candidate, FeatureVector, GeoPoint};
use crate::pipeline::CandidateSource;
use crate::tasks::{BackgroundTask, TaskLookup, TaskStatus, TaskSummary};

/// Task snapshot as served over HTTP, with the derived duration attached.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub task_id: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
    pub result_summary: Option<TaskSummary>,
    pub error: Option<String>,
}

impl From<BackgroundTask> for TaskStatusResponse {
    fn from(task: BackgroundTask) -> Self {
        let duration_seconds = task.duration_seconds();
        Self {
            task_id: task.id,
            status: task.status,
            started_at: task.started_at,
            completed_at: task.completed_at,
            duration_seconds,
            result_summary: task.result_summary,
            error: task.error,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelTaskResponse {
    pub message: String,
    pub task_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// A lost or found pet report as submitted by the intake service.
#[derive(Debug, Serialize, Deserialize)]
pub struct PetReportRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub feature_vector: Vec<f32>,
    #[serde(default)]
    pub attributes: Option<Attributes>,
    #[serde(default)]
    pub geo_point: Option<GeoPoint>,
    #[serde(default)]
    pub observed_date: Option<NaiveDate>,
}

impl PetReportRequest {
    fn into_candidate(self) -> Result<Candidate, GatewayError> {
        if self.feature_vector.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "feature_vector must not be empty".to_string(),
            ));
        }
        if let Some(point) = self.geo_point
            && !point.is_valid()
        {
            return Err(GatewayError::InvalidRequest(format!(
                "geo_point out of range: {}, {}",
                point.latitude, point.longitude
            )));
        }

        let id = self.id.unwrap_or_else(Uuid::new_v4);
        let mut candidate = Candidate::from_vector(id, &FeatureVector::new(self.feature_vector));
        candidate.attributes = self.attributes;
        candidate.geo_point = self.geo_point;
        candidate.observed_date = self.observed_date;
        Ok(candidate)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PetReportResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub task_id: String,
    pub found_pet_id: Uuid,
}

#[tracing::instrument(skip(state, request))]
pub async fn register_lost_pet_handler(
    State(state): State<HandlerState>,
    Json(request): Json<PetReportRequest>,
) -> Result<(StatusCode, Json<PetReportResponse>), GatewayError> {
    let candidate = request.into_candidate()?;
    let id = candidate.id;
    state.reports.insert_lost(candidate);
    tracing::debug!(lost_pet_id = %id, "Lost pet registered");

    Ok((StatusCode::CREATED, Json(PetReportResponse { id })))
}

#[tracing::instrument(skip(state, request))]
pub async fn register_found_pet_handler(
    State(state): State<HandlerState>,
    Json(request): Json<PetReportRequest>,
) -> Result<(StatusCode, Json<PetReportResponse>), GatewayError> {
    let candidate = request.into_candidate()?;
    let id = candidate.id;
    state.reports.insert_found(candidate);
    tracing::debug!(found_pet_id = %id, "Found pet registered");

    Ok((StatusCode::CREATED, Json(PetReportResponse { id })))
}

/// Queues a match search for a registered found pet. Poll the returned task id.
#[tracing::instrument(skip(state))]
pub async fn submit_find_matches_handler(
    State(state): State<HandlerState>,
    Path(found_pet_id): Path<String>,
) -> Result<(StatusCode, Json<FindMatchesResponse>), GatewayError> {
    let found_pet_id = Uuid::parse_str(&found_pet_id).map_err(|e| {
        GatewayError::InvalidRequest(format!("malformed found pet id '{found_pet_id}': {e}"))
    })?;
    if state.reports.found_pet(found_pet_id)?.is_none() {
        return Err(GatewayError::NotFound(format!(
            "found pet not found: {found_pet_id}"
        )));
    }

    let task_id = state
        .pipeline
        .submit_find_matches(&state.registry, found_pet_id)?;
    tracing::info!(task_id = %task_id, "Match search queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(FindMatchesResponse {
            task_id,
            found_pet_id,
        }),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_task_handler(
    State(state): State<HandlerState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskStatusResponse>, GatewayError> {
    match state.registry.get_status(&task_id) {
        TaskLookup::Found(task) => Ok(Json(task.into())),
        TaskLookup::NotFound => Err(GatewayError::NotFound(format!(
            "task not found: {task_id}"
        ))),
    }
}

#[tracing::instrument(skip(state))]
pub async fn cancel_task_handler(
    State(state): State<HandlerState>,
    Path(task_id): Path<String>,
) -> Result<Json<CancelTaskResponse>, GatewayError> {
    let task = state.registry.try_cancel(&task_id)?;
    tracing::info!(task_id = %task.id, "Task canceled over HTTP");

    Ok(Json(CancelTaskResponse {
        message: "Task canceled".to_string(),
        task_id: task.id,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn get_match_handler(
    State(state): State<HandlerState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchRecord>, GatewayError> {
    let match_id = parse_match_id(&match_id)?;
    Ok(Json(state.ledger.get(match_id)?))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_match_status_handler(
    State(state): State<HandlerState>,
    Path(match_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<MatchRecord>, GatewayError> {
    let match_id = parse_match_id(&match_id)?;

    let status: MatchStatus = request
        .status
        .parse()
        .map_err(GatewayError::InvalidRequest)?;
    if !status.is_terminal() {
        return Err(GatewayError::InvalidRequest(format!(
            "status must be confirmed or rejected, got '{status}'"
        )));
    }

    let record = state.ledger.update_status(match_id, status)?;
    tracing::info!(match_id = %record.id, status = %record.status, "Match status updated");

    Ok(Json(record))
}

fn parse_match_id(raw: &str) -> Result<Uuid, GatewayError> {
    Uuid::parse_str(raw)
        .map_err(|e| GatewayError::InvalidRequest(format!("malformed match id '{raw}': {e}")))
}
