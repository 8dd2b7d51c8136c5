#![allow(async_fn_in_trait)]

use uuid::Uuid;

use parkverse_domain::job::JobStatus;
use parkverse_domain::notification::{Channel, DeliveryStatus};
use parkverse_domain::pagination::Page;

use crate::domain::types::{
    DeliveryAttempt, DispatchStaged, Job, JobUpdate, NewNotificationEvent, NotificationEvent,
    PreferenceRow, PublishSpec,
};
use crate::error::DispatchServiceError;

/// Repository for idempotency claims.
pub trait IdempotencyRepository: Send + Sync {
    /// Atomically create the claim row for `key`. Returns `true` when this
    /// call created it, `false` when a claim already existed. Concurrent
    /// claims for the same key are serialized by the store's unique index.
    async fn claim(&self, key: &str) -> Result<bool, DispatchServiceError>;

    /// Delete the claim if present. Returns `true` if a row was deleted;
    /// releasing an absent key is not an error.
    async fn release(&self, key: &str) -> Result<bool, DispatchServiceError>;
}

/// Repository for dispatched jobs.
pub trait JobRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, DispatchServiceError>;

    /// Guarded write: applies `update` only while the stored status is still
    /// `expected`. Returns `false` when the row changed underneath the
    /// caller (or vanished), so concurrent updates never interleave.
    async fn apply_update(
        &self,
        id: Uuid,
        expected: JobStatus,
        update: &JobUpdate,
    ) -> Result<bool, DispatchServiceError>;
}

/// Repository for notification events (the web tray).
pub trait NotificationEventRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<NotificationEvent>, DispatchServiceError>;

    /// Undismissed events for a user, newest first.
    async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        page: Page,
    ) -> Result<Vec<NotificationEvent>, DispatchServiceError>;

    async fn unread_count(&self, user_id: i64) -> Result<u64, DispatchServiceError>;

    /// Mark one event read. Returns `true` if the event exists.
    async fn mark_read(&self, event_id: i64) -> Result<bool, DispatchServiceError>;

    /// Mark every unread event for the user read; returns how many changed.
    async fn mark_all_read(&self, user_id: i64) -> Result<u64, DispatchServiceError>;

    /// Dismiss one event from the tray. Returns `true` if the event exists.
    async fn dismiss(&self, event_id: i64) -> Result<bool, DispatchServiceError>;
}

/// Repository for per-channel delivery outcomes.
pub trait DeliveryLogRepository: Send + Sync {
    /// Upsert the `(event, channel)` outcome; the latest call wins.
    async fn record(
        &self,
        event_id: i64,
        channel: Channel,
        status: DeliveryStatus,
        error_message: Option<&str>,
    ) -> Result<(), DispatchServiceError>;

    async fn fetch_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<DeliveryAttempt>, DispatchServiceError>;
}

/// Repository for explicit notification preferences.
pub trait PreferenceRepository: Send + Sync {
    async fn fetch_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<PreferenceRow>, DispatchServiceError>;

    async fn upsert(&self, row: &PreferenceRow) -> Result<(), DispatchServiceError>;
}

/// Port for the producer-side dispatch staging transaction: claim the
/// idempotency key, persist the event, stage the broker message, and create
/// the job — atomically, so a claim is never observably split from its
/// publish.
pub trait DispatchRepository: Send + Sync {
    async fn stage_dispatch(
        &self,
        claim_key: Option<&str>,
        event: &NewNotificationEvent,
        publish: Option<&PublishSpec>,
    ) -> Result<DispatchStaged, DispatchServiceError>;
}
