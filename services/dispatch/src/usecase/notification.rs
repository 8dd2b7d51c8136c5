use parkverse_domain::notification::{Channel, DeliveryStatus};
use parkverse_domain::pagination::Page;

use crate::domain::repository::{DeliveryLogRepository, NotificationEventRepository};
use crate::domain::types::{DeliveryAttempt, NotificationEvent};
use crate::error::DispatchServiceError;

// ── GetUserEvents ────────────────────────────────────────────────────────────

pub struct GetUserEventsUseCase<R: NotificationEventRepository> {
    pub repo: R,
}

impl<R: NotificationEventRepository> GetUserEventsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i64,
        unread_only: bool,
        page: Page,
    ) -> Result<Vec<NotificationEvent>, DispatchServiceError> {
        self.repo
            .list_for_user(user_id, unread_only, page.clamped())
            .await
    }
}

// ── GetUnreadCount ───────────────────────────────────────────────────────────

pub struct GetUnreadCountUseCase<R: NotificationEventRepository> {
    pub repo: R,
}

impl<R: NotificationEventRepository> GetUnreadCountUseCase<R> {
    pub async fn execute(&self, user_id: i64) -> Result<u64, DispatchServiceError> {
        self.repo.unread_count(user_id).await
    }
}

// ── MarkRead ─────────────────────────────────────────────────────────────────

pub struct MarkReadUseCase<R: NotificationEventRepository> {
    pub repo: R,
}

impl<R: NotificationEventRepository> MarkReadUseCase<R> {
    pub async fn execute(&self, event_id: i64) -> Result<(), DispatchServiceError> {
        if !self.repo.mark_read(event_id).await? {
            return Err(DispatchServiceError::EventNotFound);
        }
        Ok(())
    }
}

// ── MarkAllRead ──────────────────────────────────────────────────────────────

pub struct MarkAllReadUseCase<R: NotificationEventRepository> {
    pub repo: R,
}

impl<R: NotificationEventRepository> MarkAllReadUseCase<R> {
    /// Returns how many events were newly marked read.
    pub async fn execute(&self, user_id: i64) -> Result<u64, DispatchServiceError> {
        self.repo.mark_all_read(user_id).await
    }
}

// ── DismissEvent ─────────────────────────────────────────────────────────────

pub struct DismissEventUseCase<R: NotificationEventRepository> {
    pub repo: R,
}

impl<R: NotificationEventRepository> DismissEventUseCase<R> {
    pub async fn execute(&self, event_id: i64) -> Result<(), DispatchServiceError> {
        if !self.repo.dismiss(event_id).await? {
            return Err(DispatchServiceError::EventNotFound);
        }
        Ok(())
    }
}

// ── RecordDeliveryResult ─────────────────────────────────────────────────────

pub struct RecordDeliveryResultUseCase<E, D>
where
    E: NotificationEventRepository,
    D: DeliveryLogRepository,
{
    pub events: E,
    pub delivery_log: D,
}

impl<E, D> RecordDeliveryResultUseCase<E, D>
where
    E: NotificationEventRepository,
    D: DeliveryLogRepository,
{
    /// Record (or overwrite) the consumer-reported outcome for one channel.
    pub async fn execute(
        &self,
        event_id: i64,
        channel: Channel,
        status: DeliveryStatus,
        error_message: Option<&str>,
    ) -> Result<(), DispatchServiceError> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(DispatchServiceError::EventNotFound);
        }
        self.delivery_log
            .record(event_id, channel, status, error_message)
            .await
    }
}

// ── GetDeliveryLog ───────────────────────────────────────────────────────────

pub struct GetDeliveryLogUseCase<E, D>
where
    E: NotificationEventRepository,
    D: DeliveryLogRepository,
{
    pub events: E,
    pub delivery_log: D,
}

impl<E, D> GetDeliveryLogUseCase<E, D>
where
    E: NotificationEventRepository,
    D: DeliveryLogRepository,
{
    /// All channel outcomes recorded so far. A channel missing from the
    /// result means no attempt was recorded yet, which is distinct from
    /// `skipped`.
    pub async fn execute(&self, event_id: i64) -> Result<Vec<DeliveryAttempt>, DispatchServiceError> {
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(DispatchServiceError::EventNotFound);
        }
        self.delivery_log.fetch_for_event(event_id).await
    }
}
