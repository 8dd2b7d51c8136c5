use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use parkverse_core::health::{healthz, readyz};
use parkverse_core::middleware::request_id_layer;

use crate::handlers::{
    idempotency::{claim_key, release_key},
    job::{get_job, update_job},
    notification::{
        create_notification, dismiss_event, get_delivery_log, get_unread_count, get_user_events,
        mark_all_read, mark_read, record_delivery_result,
    },
    preference::{get_legacy_bitmask, get_preferences, should_deliver, update_preferences},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Internal: idempotency gate + job tracker
        .route("/internal/idempotency/claim", post(claim_key))
        .route("/internal/idempotency/claim", delete(release_key))
        .route("/internal/jobs/{job_id}", get(get_job))
        .route("/internal/jobs/{job_id}", patch(update_job))
        // Notification events
        .route("/notifications/events", post(create_notification))
        .route("/notifications/events/{event_id}/read", patch(mark_read))
        .route(
            "/notifications/events/{event_id}/dismiss",
            patch(dismiss_event),
        )
        .route(
            "/notifications/events/{event_id}/delivery-result",
            post(record_delivery_result),
        )
        .route(
            "/notifications/events/{event_id}/delivery-log",
            get(get_delivery_log),
        )
        .route("/notifications/users/{user_id}/events", get(get_user_events))
        .route(
            "/notifications/users/{user_id}/unread-count",
            get(get_unread_count),
        )
        .route(
            "/notifications/users/{user_id}/read-all",
            patch(mark_all_read),
        )
        // Preferences
        .route(
            "/notifications/users/{user_id}/preferences",
            get(get_preferences),
        )
        .route(
            "/notifications/users/{user_id}/preferences",
            put(update_preferences),
        )
        .route(
            "/notifications/users/{user_id}/should-deliver",
            get(should_deliver),
        )
        .route(
            "/notifications/users/{user_id}/legacy-bitmask",
            get(get_legacy_bitmask),
        )
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
