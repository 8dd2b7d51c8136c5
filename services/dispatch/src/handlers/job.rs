use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parkverse_domain::job::JobStatus;

use crate::error::DispatchServiceError;
use crate::state::AppState;
use crate::usecase::job::{GetJobUseCase, UpdateJobInput, UpdateJobUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct JobResponse {
    pub id: String,
    pub status: &'static str,
    pub error_code: Option<String>,
    pub error_msg: Option<String>,
}

// ── GET /internal/jobs/{job_id} ──────────────────────────────────────────────

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobResponse>, DispatchServiceError> {
    let usecase = GetJobUseCase {
        repo: state.job_repo(),
    };
    let job = usecase.execute(job_id).await?;
    Ok(Json(JobResponse {
        id: job.id.to_string(),
        status: job.status.as_str(),
        error_code: job.error_code,
        error_msg: job.error_msg,
    }))
}

// ── PATCH /internal/jobs/{job_id} ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct JobUpdateRequest {
    pub status: String,
    pub result: Option<serde_json::Value>,
    pub error_code: Option<String>,
    pub error_msg: Option<String>,
}

pub async fn update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<JobUpdateRequest>,
) -> Result<StatusCode, DispatchServiceError> {
    // Reject unknown status strings before touching storage.
    let status =
        JobStatus::from_str_name(&body.status).ok_or(DispatchServiceError::InvalidJobStatus)?;

    let usecase = UpdateJobUseCase {
        repo: state.job_repo(),
    };
    usecase
        .execute(
            job_id,
            UpdateJobInput {
                status,
                result: body.result,
                error_code: body.error_code,
                error_msg: body.error_msg,
            },
        )
        .await?;
    Ok(StatusCode::OK)
}
