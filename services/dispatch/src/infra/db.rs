use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
    sea_query::{Expr, ExprTrait as _, Func, OnConflict},
};
use uuid::Uuid;

use parkverse_domain::delivery::DeliveryMessage;
use parkverse_domain::job::JobStatus;
use parkverse_domain::notification::{Channel, DeliveryStatus, EventType};
use parkverse_domain::pagination::Page;
use parkverse_dispatch_schema::{
    delivery_log, idempotency_claims, jobs, notification_events, notification_preferences,
    outbox_messages,
};

use crate::domain::repository::{
    DeliveryLogRepository, DispatchRepository, IdempotencyRepository, JobRepository,
    NotificationEventRepository, PreferenceRepository,
};
use crate::domain::types::{
    DeliveryAttempt, DispatchStaged, Job, JobUpdate, NewNotificationEvent, NotificationEvent,
    PreferenceRow, PublishSpec,
};
use crate::error::DispatchServiceError;

// ── Idempotency repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdempotencyRepository {
    pub db: DatabaseConnection,
}

impl IdempotencyRepository for DbIdempotencyRepository {
    async fn claim(&self, key: &str) -> Result<bool, DispatchServiceError> {
        let claimed = insert_claim(&self.db, key)
            .await
            .context("claim idempotency key")?;
        Ok(claimed)
    }

    async fn release(&self, key: &str) -> Result<bool, DispatchServiceError> {
        let result = idempotency_claims::Entity::delete_many()
            .filter(idempotency_claims::Column::Key.eq(key))
            .exec(&self.db)
            .await
            .context("release idempotency key")?;
        Ok(result.rows_affected > 0)
    }
}

/// Insert-if-absent via the primary key. The store serializes concurrent
/// claims; exactly one caller sees a row count of 1.
async fn insert_claim<C: ConnectionTrait>(conn: &C, key: &str) -> Result<bool, sea_orm::DbErr> {
    let rows = idempotency_claims::Entity::insert(idempotency_claims::ActiveModel {
        key: Set(key.to_owned()),
        claimed_at: Set(Utc::now()),
    })
    .on_conflict(
        OnConflict::column(idempotency_claims::Column::Key)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;
    Ok(rows > 0)
}

// ── Job repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbJobRepository {
    pub db: DatabaseConnection,
}

impl JobRepository for DbJobRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, DispatchServiceError> {
        let model = jobs::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find job by id")?;
        model.map(job_from_model).transpose()
    }

    async fn apply_update(
        &self,
        id: Uuid,
        expected: JobStatus,
        update: &JobUpdate,
    ) -> Result<bool, DispatchServiceError> {
        let now = Utc::now();
        let query = jobs::Entity::update_many()
            .filter(jobs::Column::Id.eq(id))
            .filter(jobs::Column::Status.eq(expected.as_str()));

        let query = match update {
            JobUpdate::Processing => query
                .col_expr(
                    jobs::Column::Status,
                    Expr::value(JobStatus::Processing.as_str()),
                )
                .col_expr(
                    jobs::Column::Attempts,
                    Expr::col(jobs::Column::Attempts).add(1),
                )
                .col_expr(
                    jobs::Column::StartedAt,
                    Func::coalesce([
                        Expr::col(jobs::Column::StartedAt).into(),
                        Expr::value(now),
                    ])
                    .into(),
                )
                .col_expr(
                    jobs::Column::Result,
                    Expr::value(Option::<serde_json::Value>::None),
                )
                .col_expr(jobs::Column::ErrorCode, Expr::value(Option::<String>::None))
                .col_expr(jobs::Column::ErrorMsg, Expr::value(Option::<String>::None)),
            JobUpdate::Succeeded { result } => query
                .col_expr(
                    jobs::Column::Status,
                    Expr::value(JobStatus::Succeeded.as_str()),
                )
                .col_expr(jobs::Column::FinishedAt, Expr::value(now))
                .col_expr(jobs::Column::Result, Expr::value(result.clone()))
                .col_expr(jobs::Column::ErrorCode, Expr::value(Option::<String>::None))
                .col_expr(jobs::Column::ErrorMsg, Expr::value(Option::<String>::None)),
            JobUpdate::Failed {
                error_code,
                error_msg,
            } => query
                .col_expr(jobs::Column::Status, Expr::value(JobStatus::Failed.as_str()))
                .col_expr(jobs::Column::FinishedAt, Expr::value(now))
                .col_expr(
                    jobs::Column::Result,
                    Expr::value(Option::<serde_json::Value>::None),
                )
                .col_expr(jobs::Column::ErrorCode, Expr::value(error_code.clone()))
                .col_expr(jobs::Column::ErrorMsg, Expr::value(error_msg.clone())),
            JobUpdate::Timeout => query
                .col_expr(
                    jobs::Column::Status,
                    Expr::value(JobStatus::Timeout.as_str()),
                )
                .col_expr(jobs::Column::FinishedAt, Expr::value(now))
                .col_expr(
                    jobs::Column::Result,
                    Expr::value(Option::<serde_json::Value>::None),
                )
                .col_expr(jobs::Column::ErrorCode, Expr::value(Option::<String>::None))
                .col_expr(jobs::Column::ErrorMsg, Expr::value(Option::<String>::None)),
        };

        let result = query.exec(&self.db).await.context("update job status")?;
        Ok(result.rows_affected > 0)
    }
}

fn job_from_model(model: jobs::Model) -> Result<Job, DispatchServiceError> {
    let status = JobStatus::from_str_name(&model.status).ok_or_else(|| {
        DispatchServiceError::Internal(anyhow::anyhow!(
            "unknown job status in storage: {}",
            model.status
        ))
    })?;
    Ok(Job {
        id: model.id,
        action: model.action,
        status,
        attempts: model.attempts,
        result: model.result,
        error_code: model.error_code,
        error_msg: model.error_msg,
        created_at: model.created_at,
        started_at: model.started_at,
        finished_at: model.finished_at,
    })
}

async fn insert_job(
    txn: &DatabaseTransaction,
    action: &str,
) -> Result<Uuid, sea_orm::DbErr> {
    let id = Uuid::new_v4();
    jobs::ActiveModel {
        id: Set(id),
        action: Set(action.to_owned()),
        status: Set(JobStatus::Queued.as_str().to_owned()),
        attempts: Set(0),
        result: Set(None),
        error_code: Set(None),
        error_msg: Set(None),
        created_at: Set(Utc::now()),
        started_at: Set(None),
        finished_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(id)
}

// ── Notification event repository ────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationEventRepository {
    pub db: DatabaseConnection,
}

impl NotificationEventRepository for DbNotificationEventRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<NotificationEvent>, DispatchServiceError> {
        let model = notification_events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find notification event")?;
        model.map(event_from_model).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        page: Page,
    ) -> Result<Vec<NotificationEvent>, DispatchServiceError> {
        let mut query = notification_events::Entity::find()
            .filter(notification_events::Column::UserId.eq(user_id))
            .filter(notification_events::Column::DismissedAt.is_null());
        if unread_only {
            query = query.filter(notification_events::Column::ReadAt.is_null());
        }
        let models = query
            .order_by_desc(notification_events::Column::CreatedAt)
            .offset(page.offset as u64)
            .limit(page.limit as u64)
            .all(&self.db)
            .await
            .context("list notification events")?;
        models.into_iter().map(event_from_model).collect()
    }

    async fn unread_count(&self, user_id: i64) -> Result<u64, DispatchServiceError> {
        let count = notification_events::Entity::find()
            .filter(notification_events::Column::UserId.eq(user_id))
            .filter(notification_events::Column::ReadAt.is_null())
            .filter(notification_events::Column::DismissedAt.is_null())
            .count(&self.db)
            .await
            .context("count unread notifications")?;
        Ok(count)
    }

    async fn mark_read(&self, event_id: i64) -> Result<bool, DispatchServiceError> {
        let result = notification_events::Entity::update_many()
            .col_expr(notification_events::Column::ReadAt, Expr::value(Utc::now()))
            .filter(notification_events::Column::Id.eq(event_id))
            .exec(&self.db)
            .await
            .context("mark notification read")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<u64, DispatchServiceError> {
        let result = notification_events::Entity::update_many()
            .col_expr(notification_events::Column::ReadAt, Expr::value(Utc::now()))
            .filter(notification_events::Column::UserId.eq(user_id))
            .filter(notification_events::Column::ReadAt.is_null())
            .exec(&self.db)
            .await
            .context("mark all notifications read")?;
        Ok(result.rows_affected)
    }

    async fn dismiss(&self, event_id: i64) -> Result<bool, DispatchServiceError> {
        let result = notification_events::Entity::update_many()
            .col_expr(
                notification_events::Column::DismissedAt,
                Expr::value(Utc::now()),
            )
            .filter(notification_events::Column::Id.eq(event_id))
            .exec(&self.db)
            .await
            .context("dismiss notification")?;
        Ok(result.rows_affected > 0)
    }
}

fn event_from_model(
    model: notification_events::Model,
) -> Result<NotificationEvent, DispatchServiceError> {
    let event_type = EventType::from_str_name(&model.event_type).ok_or_else(|| {
        DispatchServiceError::Internal(anyhow::anyhow!(
            "unknown event type in storage: {}",
            model.event_type
        ))
    })?;
    Ok(NotificationEvent {
        id: model.id,
        user_id: model.user_id,
        event_type,
        title: model.title,
        body: model.body,
        discord_message: model.discord_message,
        metadata: model.metadata,
        created_at: model.created_at,
        read_at: model.read_at,
        dismissed_at: model.dismissed_at,
    })
}

async fn insert_event(
    txn: &DatabaseTransaction,
    event: &NewNotificationEvent,
) -> Result<notification_events::Model, sea_orm::DbErr> {
    notification_events::ActiveModel {
        user_id: Set(event.user_id),
        event_type: Set(event.event_type.as_str().to_owned()),
        title: Set(event.title.clone()),
        body: Set(event.body.clone()),
        discord_message: Set(event.discord_message.clone()),
        metadata: Set(event.metadata.clone()),
        created_at: Set(Utc::now()),
        read_at: Set(None),
        dismissed_at: Set(None),
        ..Default::default()
    }
    .insert(txn)
    .await
}

// ── Delivery log repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDeliveryLogRepository {
    pub db: DatabaseConnection,
}

impl DeliveryLogRepository for DbDeliveryLogRepository {
    async fn record(
        &self,
        event_id: i64,
        channel: Channel,
        status: DeliveryStatus,
        error_message: Option<&str>,
    ) -> Result<(), DispatchServiceError> {
        let now = Utc::now();
        let attempt = delivery_log::ActiveModel {
            event_id: Set(event_id),
            channel: Set(channel.as_str().to_owned()),
            status: Set(status.as_str().to_owned()),
            attempted_at: Set(now),
            delivered_at: Set((status == DeliveryStatus::Delivered).then_some(now)),
            error_message: Set(error_message.map(str::to_owned)),
        };
        delivery_log::Entity::insert(attempt)
            .on_conflict(
                OnConflict::columns([
                    delivery_log::Column::EventId,
                    delivery_log::Column::Channel,
                ])
                .update_columns([
                    delivery_log::Column::Status,
                    delivery_log::Column::AttemptedAt,
                    delivery_log::Column::DeliveredAt,
                    delivery_log::Column::ErrorMessage,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("record delivery result")?;
        Ok(())
    }

    async fn fetch_for_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<DeliveryAttempt>, DispatchServiceError> {
        let models = delivery_log::Entity::find()
            .filter(delivery_log::Column::EventId.eq(event_id))
            .order_by_asc(delivery_log::Column::Channel)
            .all(&self.db)
            .await
            .context("fetch delivery log")?;
        models.into_iter().map(delivery_attempt_from_model).collect()
    }
}

fn delivery_attempt_from_model(
    model: delivery_log::Model,
) -> Result<DeliveryAttempt, DispatchServiceError> {
    let channel = Channel::from_str_name(&model.channel).ok_or_else(|| {
        DispatchServiceError::Internal(anyhow::anyhow!(
            "unknown channel in storage: {}",
            model.channel
        ))
    })?;
    let status = DeliveryStatus::from_str_name(&model.status).ok_or_else(|| {
        DispatchServiceError::Internal(anyhow::anyhow!(
            "unknown delivery status in storage: {}",
            model.status
        ))
    })?;
    Ok(DeliveryAttempt {
        event_id: model.event_id,
        channel,
        status,
        attempted_at: model.attempted_at,
        delivered_at: model.delivered_at,
        error_message: model.error_message,
    })
}

// ── Preference repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPreferenceRepository {
    pub db: DatabaseConnection,
}

impl PreferenceRepository for DbPreferenceRepository {
    async fn fetch_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<PreferenceRow>, DispatchServiceError> {
        let models = notification_preferences::Entity::find()
            .filter(notification_preferences::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("fetch notification preferences")?;
        models.into_iter().map(preference_from_model).collect()
    }

    async fn upsert(&self, row: &PreferenceRow) -> Result<(), DispatchServiceError> {
        let preference = notification_preferences::ActiveModel {
            user_id: Set(row.user_id),
            event_type: Set(row.event_type.as_str().to_owned()),
            channel: Set(row.channel.as_str().to_owned()),
            enabled: Set(row.enabled),
        };
        notification_preferences::Entity::insert(preference)
            .on_conflict(
                OnConflict::columns([
                    notification_preferences::Column::UserId,
                    notification_preferences::Column::EventType,
                    notification_preferences::Column::Channel,
                ])
                .update_columns([notification_preferences::Column::Enabled])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert notification preference")?;
        Ok(())
    }
}

fn preference_from_model(
    model: notification_preferences::Model,
) -> Result<PreferenceRow, DispatchServiceError> {
    let event_type = EventType::from_str_name(&model.event_type).ok_or_else(|| {
        DispatchServiceError::Internal(anyhow::anyhow!(
            "unknown event type in storage: {}",
            model.event_type
        ))
    })?;
    let channel = Channel::from_str_name(&model.channel).ok_or_else(|| {
        DispatchServiceError::Internal(anyhow::anyhow!(
            "unknown channel in storage: {}",
            model.channel
        ))
    })?;
    Ok(PreferenceRow {
        user_id: model.user_id,
        event_type,
        channel,
        enabled: model.enabled,
    })
}

// ── Dispatch repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDispatchRepository {
    pub db: DatabaseConnection,
}

impl DispatchRepository for DbDispatchRepository {
    async fn stage_dispatch(
        &self,
        claim_key: Option<&str>,
        event: &NewNotificationEvent,
        publish: Option<&PublishSpec>,
    ) -> Result<DispatchStaged, DispatchServiceError> {
        let claim_key = claim_key.map(str::to_owned);
        let event = event.clone();
        let publish = publish.cloned();

        let staged = self
            .db
            .transaction::<_, DispatchStaged, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    if let Some(key) = claim_key.as_deref() {
                        if !insert_claim(txn, key).await? {
                            return Ok(DispatchStaged::Duplicate);
                        }
                    }

                    let model = insert_event(txn, &event).await?;
                    let mut job_id = None;

                    if let Some(spec) = publish {
                        let message = DeliveryMessage {
                            event_id: model.id,
                            user_id: event.user_id,
                            event_type: event.event_type,
                            title: event.title.clone(),
                            body: event.body.clone(),
                            discord_message: event.discord_message.clone(),
                            metadata: event.metadata.clone(),
                            channels_to_deliver: spec.channels_to_deliver.clone(),
                        };
                        let payload = serde_json::to_value(&message).map_err(|e| {
                            sea_orm::DbErr::Custom(format!("serialize delivery message: {e}"))
                        })?;
                        // Unkeyed dispatches still attach a key derived from
                        // the event id so consumers can always deduplicate.
                        let idempotency_key = claim_key
                            .clone()
                            .unwrap_or_else(|| format!("notification.delivery:{}", model.id));
                        insert_outbox_message(txn, &spec.routing_key, payload, &idempotency_key)
                            .await?;
                        job_id = Some(insert_job(txn, &spec.routing_key).await?);
                    }

                    Ok(DispatchStaged::Created {
                        event: NotificationEvent {
                            id: model.id,
                            user_id: event.user_id,
                            event_type: event.event_type,
                            title: event.title,
                            body: event.body,
                            discord_message: event.discord_message,
                            metadata: event.metadata,
                            created_at: model.created_at,
                            read_at: None,
                            dismissed_at: None,
                        },
                        job_id,
                    })
                })
            })
            .await
            .context("stage dispatch")?;
        Ok(staged)
    }
}

async fn insert_outbox_message(
    txn: &DatabaseTransaction,
    routing_key: &str,
    payload: serde_json::Value,
    idempotency_key: &str,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        routing_key: Set(routing_key.to_owned()),
        payload: Set(payload),
        idempotency_key: Set(idempotency_key.to_owned()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}
