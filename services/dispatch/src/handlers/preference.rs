use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use parkverse_domain::notification::{Channel, EventType};

use crate::error::DispatchServiceError;
use crate::state::AppState;
use crate::usecase::preference::{
    BulkUpdatePreferencesUseCase, GetPreferencesUseCase, LegacyBitmaskUseCase, PreferenceUpdate,
    ShouldDeliverUseCase,
};

// ── GET /notifications/users/{user_id}/preferences ───────────────────────────

#[derive(Serialize)]
pub struct PreferencesResponse {
    pub event_type: EventType,
    /// Channel name → resolved enabled state (explicit row or default).
    pub channels: BTreeMap<&'static str, bool>,
}

pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<PreferencesResponse>>, DispatchServiceError> {
    let usecase = GetPreferencesUseCase {
        repo: state.preference_repo(),
    };
    let resolved = usecase.execute(user_id).await?;
    Ok(Json(
        resolved
            .into_iter()
            .map(|prefs| PreferencesResponse {
                event_type: prefs.event_type,
                channels: prefs
                    .channels
                    .into_iter()
                    .map(|(channel, enabled)| (channel.as_str(), enabled))
                    .collect(),
            })
            .collect(),
    ))
}

// ── PUT /notifications/users/{user_id}/preferences ───────────────────────────

#[derive(Deserialize)]
pub struct PreferenceEntry {
    pub event_type: String,
    pub channel: String,
    pub enabled: bool,
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(body): Json<Vec<PreferenceEntry>>,
) -> Result<StatusCode, DispatchServiceError> {
    // Validate the whole batch up front; malformed entries never partially
    // apply. Storage failures mid-batch still leave earlier entries in place.
    let updates = body
        .into_iter()
        .map(|entry| {
            let event_type = EventType::from_str_name(&entry.event_type)
                .ok_or(DispatchServiceError::InvalidEventType)?;
            let channel = Channel::from_str_name(&entry.channel)
                .ok_or(DispatchServiceError::InvalidChannel)?;
            Ok(PreferenceUpdate {
                event_type,
                channel,
                enabled: entry.enabled,
            })
        })
        .collect::<Result<Vec<_>, DispatchServiceError>>()?;

    let usecase = BulkUpdatePreferencesUseCase {
        repo: state.preference_repo(),
    };
    usecase.execute(user_id, updates).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /notifications/users/{user_id}/should-deliver ────────────────────────

#[derive(Deserialize)]
pub struct ShouldDeliverQuery {
    pub event_type: String,
    pub channel: String,
}

#[derive(Serialize)]
pub struct ShouldDeliverResponse {
    pub should_deliver: bool,
}

pub async fn should_deliver(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<ShouldDeliverQuery>,
) -> Result<Json<ShouldDeliverResponse>, DispatchServiceError> {
    let event_type = EventType::from_str_name(&query.event_type)
        .ok_or(DispatchServiceError::InvalidEventType)?;
    let channel =
        Channel::from_str_name(&query.channel).ok_or(DispatchServiceError::InvalidChannel)?;

    let usecase = ShouldDeliverUseCase {
        repo: state.preference_repo(),
    };
    let should_deliver = usecase.execute(user_id, event_type, channel).await?;
    Ok(Json(ShouldDeliverResponse { should_deliver }))
}

// ── GET /notifications/users/{user_id}/legacy-bitmask ────────────────────────

#[derive(Serialize)]
pub struct LegacyBitmaskResponse {
    pub bitmask: u32,
}

pub async fn get_legacy_bitmask(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<LegacyBitmaskResponse>, DispatchServiceError> {
    let usecase = LegacyBitmaskUseCase {
        repo: state.preference_repo(),
    };
    let bitmask = usecase.execute(user_id).await?;
    Ok(Json(LegacyBitmaskResponse { bitmask }))
}
