use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use parkverse_domain::notification::{Channel, DeliveryStatus, EventType};
use parkverse_domain::pagination::Page;

use crate::domain::types::NotificationEvent;
use crate::error::DispatchServiceError;
use crate::state::AppState;
use crate::usecase::dispatch::{DispatchEventInput, DispatchEventUseCase};
use crate::usecase::notification::{
    DismissEventUseCase, GetDeliveryLogUseCase, GetUnreadCountUseCase, GetUserEventsUseCase,
    MarkAllReadUseCase, MarkReadUseCase, RecordDeliveryResultUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NotificationEventResponse {
    pub id: i64,
    pub user_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub body: String,
    pub discord_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    #[serde(serialize_with = "parkverse_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "parkverse_core::serde::to_rfc3339_ms_opt")]
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "parkverse_core::serde::to_rfc3339_ms_opt")]
    pub dismissed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<NotificationEvent> for NotificationEventResponse {
    fn from(event: NotificationEvent) -> Self {
        Self {
            id: event.id,
            user_id: event.user_id,
            event_type: event.event_type,
            title: event.title,
            body: event.body,
            discord_message: event.discord_message,
            metadata: event.metadata,
            created_at: event.created_at,
            read_at: event.read_at,
            dismissed_at: event.dismissed_at,
        }
    }
}

// ── POST /notifications/events ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub idempotency_key: Option<String>,
    pub user_id: i64,
    pub event_type: String,
    pub title: String,
    pub body: String,
    pub discord_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct DispatchEventResponse {
    pub duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<NotificationEventResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

pub async fn create_notification(
    State(state): State<AppState>,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<DispatchEventResponse>), DispatchServiceError> {
    let event_type = EventType::from_str_name(&body.event_type)
        .ok_or(DispatchServiceError::InvalidEventType)?;

    let usecase = DispatchEventUseCase {
        preferences: state.preference_repo(),
        dispatch: state.dispatch_repo(),
    };
    let receipt = usecase
        .execute(DispatchEventInput {
            idempotency_key: body.idempotency_key,
            user_id: body.user_id,
            event_type,
            title: body.title,
            body: body.body,
            discord_message: body.discord_message,
            metadata: body.metadata,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DispatchEventResponse {
            duplicate: receipt.duplicate,
            event: receipt.event.map(NotificationEventResponse::from),
            job_id: receipt.job_id.map(|id| id.to_string()),
        }),
    ))
}

// ── GET /notifications/users/{user_id}/events ────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EventListQuery {
    pub unread_only: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn get_user_events(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<NotificationEventResponse>>, DispatchServiceError> {
    let page = Page {
        limit: query.limit.unwrap_or(50),
        offset: query.offset.unwrap_or(0),
    };
    let usecase = GetUserEventsUseCase {
        repo: state.event_repo(),
    };
    let events = usecase
        .execute(user_id, query.unread_only.unwrap_or(false), page)
        .await?;
    Ok(Json(
        events
            .into_iter()
            .map(NotificationEventResponse::from)
            .collect(),
    ))
}

// ── GET /notifications/users/{user_id}/unread-count ──────────────────────────

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

pub async fn get_unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UnreadCountResponse>, DispatchServiceError> {
    let usecase = GetUnreadCountUseCase {
        repo: state.event_repo(),
    };
    let count = usecase.execute(user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

// ── PATCH /notifications/events/{event_id}/read ──────────────────────────────

pub async fn mark_read(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, DispatchServiceError> {
    let usecase = MarkReadUseCase {
        repo: state.event_repo(),
    };
    usecase.execute(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /notifications/users/{user_id}/read-all ────────────────────────────

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub marked_read: u64,
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<MarkAllReadResponse>, DispatchServiceError> {
    let usecase = MarkAllReadUseCase {
        repo: state.event_repo(),
    };
    let marked_read = usecase.execute(user_id).await?;
    Ok(Json(MarkAllReadResponse { marked_read }))
}

// ── PATCH /notifications/events/{event_id}/dismiss ───────────────────────────

pub async fn dismiss_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, DispatchServiceError> {
    let usecase = DismissEventUseCase {
        repo: state.event_repo(),
    };
    usecase.execute(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /notifications/events/{event_id}/delivery-result ────────────────────

#[derive(Deserialize)]
pub struct DeliveryResultRequest {
    pub channel: String,
    pub status: String,
    pub error_message: Option<String>,
}

pub async fn record_delivery_result(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(body): Json<DeliveryResultRequest>,
) -> Result<StatusCode, DispatchServiceError> {
    let channel =
        Channel::from_str_name(&body.channel).ok_or(DispatchServiceError::InvalidChannel)?;
    let status = DeliveryStatus::from_str_name(&body.status)
        .ok_or(DispatchServiceError::InvalidDeliveryStatus)?;

    let usecase = RecordDeliveryResultUseCase {
        events: state.event_repo(),
        delivery_log: state.delivery_log_repo(),
    };
    usecase
        .execute(event_id, channel, status, body.error_message.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /notifications/events/{event_id}/delivery-log ────────────────────────

#[derive(Serialize)]
pub struct DeliveryAttemptResponse {
    pub channel: Channel,
    pub status: DeliveryStatus,
    #[serde(serialize_with = "parkverse_core::serde::to_rfc3339_ms")]
    pub attempted_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "parkverse_core::serde::to_rfc3339_ms_opt")]
    pub delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    pub error_message: Option<String>,
}

pub async fn get_delivery_log(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<DeliveryAttemptResponse>>, DispatchServiceError> {
    let usecase = GetDeliveryLogUseCase {
        events: state.event_repo(),
        delivery_log: state.delivery_log_repo(),
    };
    let attempts = usecase.execute(event_id).await?;
    Ok(Json(
        attempts
            .into_iter()
            .map(|attempt| DeliveryAttemptResponse {
                channel: attempt.channel,
                status: attempt.status,
                attempted_at: attempt.attempted_at,
                delivered_at: attempt.delivered_at,
                error_message: attempt.error_message,
            })
            .collect(),
    ))
}
