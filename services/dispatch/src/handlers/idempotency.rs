use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::DispatchServiceError;
use crate::state::AppState;
use crate::usecase::idempotency::{ClaimKeyUseCase, ReleaseKeyUseCase};

#[derive(Deserialize)]
pub struct ClaimRequest {
    pub key: String,
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub claimed: bool,
}

// ── POST /internal/idempotency/claim ─────────────────────────────────────────

pub async fn claim_key(
    State(state): State<AppState>,
    Json(body): Json<ClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), DispatchServiceError> {
    let usecase = ClaimKeyUseCase {
        repo: state.idempotency_repo(),
    };
    let claimed = usecase.execute(&body.key).await?;
    Ok((StatusCode::CREATED, Json(ClaimResponse { claimed })))
}

// ── DELETE /internal/idempotency/claim ───────────────────────────────────────

pub async fn release_key(
    State(state): State<AppState>,
    Json(body): Json<ClaimRequest>,
) -> Result<StatusCode, DispatchServiceError> {
    let usecase = ReleaseKeyUseCase {
        repo: state.idempotency_repo(),
    };
    usecase.execute(&body.key).await?;
    Ok(StatusCode::NO_CONTENT)
}
