//! Job submission and lookup endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use acp_core::{Job, JobId, JobStatus};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_job))
        .route("/{id}", get(get_job))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitJobRequest {
    #[serde(default)]
    task_type: String,
    #[serde(default)]
    agent_id: String,
    /// Opaque payload handed to the task executor. Defaults to null.
    #[serde(default)]
    context: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitJobResponse {
    job_id: String,
    status: JobStatus,
    monitor_path: String,
}

/// Accept a task submission and return its tracking id immediately.
/// Completion is observed over the `/ws` stream, never awaited here.
async fn submit_job(
    State(state): State<AppState>,
    Json(req): Json<SubmitJobRequest>,
) -> Result<(StatusCode, Json<SubmitJobResponse>), ApiError> {
    let job = state
        .dispatcher
        .submit(&req.task_type, &req.agent_id, req.context)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitJobResponse {
            job_id: job.id.to_string(),
            status: job.status,
            monitor_path: "/ws".to_string(),
        }),
    ))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> Result<Json<Job>, ApiError> {
    let job = state
        .dispatcher
        .get_job(id)
        .ok_or_else(|| ApiError::NotFound(format!("job {id}")))?;
    Ok(Json(job))
}
