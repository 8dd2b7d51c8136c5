use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use parkverse_core::error::ErrorBody;

/// Dispatch service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum DispatchServiceError {
    #[error("job not found")]
    JobNotFound,
    #[error("notification event not found")]
    EventNotFound,
    #[error("invalid job status")]
    InvalidJobStatus,
    #[error("invalid event type")]
    InvalidEventType,
    #[error("invalid channel")]
    InvalidChannel,
    #[error("invalid delivery status")]
    InvalidDeliveryStatus,
    #[error("missing data")]
    MissingData,
    #[error("job status transition conflict")]
    JobTransitionConflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl DispatchServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JobNotFound => "JOB_NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::InvalidJobStatus => "INVALID_JOB_STATUS",
            Self::InvalidEventType => "INVALID_EVENT_TYPE",
            Self::InvalidChannel => "INVALID_CHANNEL",
            Self::InvalidDeliveryStatus => "INVALID_DELIVERY_STATUS",
            Self::MissingData => "MISSING_DATA",
            Self::JobTransitionConflict => "JOB_TRANSITION_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for DispatchServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::JobNotFound | Self::EventNotFound => StatusCode::NOT_FOUND,
            Self::InvalidJobStatus
            | Self::InvalidEventType
            | Self::InvalidChannel
            | Self::InvalidDeliveryStatus
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::JobTransitionConflict => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — TraceLayer already records method/uri/status for all
        // requests, and 4xx/409 are expected client outcomes.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        ErrorBody::new(self.kind(), self.to_string()).into_response(status)
    }
}
