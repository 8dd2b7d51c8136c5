use chrono::{DateTime, Utc};
use uuid::Uuid;

use parkverse_domain::job::JobStatus;
use parkverse_domain::notification::{Channel, DeliveryStatus, EventType};

/// A tracked unit of asynchronous work.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub action: String,
    pub status: JobStatus,
    pub attempts: i32,
    pub result: Option<serde_json::Value>,
    pub error_code: Option<String>,
    pub error_msg: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Validated status change to apply to a job. Constructing one of these is
/// the only way error fields reach storage, which keeps the invariant that
/// they are set iff the job failed.
#[derive(Debug, Clone)]
pub enum JobUpdate {
    Processing,
    Succeeded { result: Option<serde_json::Value> },
    Failed { error_code: String, error_msg: String },
    Timeout,
}

impl JobUpdate {
    pub fn status(&self) -> JobStatus {
        match self {
            Self::Processing => JobStatus::Processing,
            Self::Succeeded { .. } => JobStatus::Succeeded,
            Self::Failed { .. } => JobStatus::Failed,
            Self::Timeout => JobStatus::Timeout,
        }
    }
}

/// A stored notification event.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub id: i64,
    pub user_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub body: String,
    pub discord_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub dismissed_at: Option<DateTime<Utc>>,
}

/// A notification event about to be persisted.
#[derive(Debug, Clone)]
pub struct NewNotificationEvent {
    pub user_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub body: String,
    pub discord_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Most recent delivery outcome for one `(event, channel)` pair.
#[derive(Debug, Clone)]
pub struct DeliveryAttempt {
    pub event_id: i64,
    pub channel: Channel,
    pub status: DeliveryStatus,
    pub attempted_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

/// Explicit preference row. Absence means "use the type's defaults".
#[derive(Debug, Clone, Copy)]
pub struct PreferenceRow {
    pub user_id: i64,
    pub event_type: EventType,
    pub channel: Channel,
    pub enabled: bool,
}

/// Broker staging instructions for a dispatch: which routing key to publish
/// under and which channels the message should carry.
#[derive(Debug, Clone)]
pub struct PublishSpec {
    pub routing_key: String,
    pub channels_to_deliver: Vec<Channel>,
}

/// What the dispatch staging transaction produced.
#[derive(Debug, Clone)]
pub enum DispatchStaged {
    /// The idempotency key was already claimed; nothing was persisted.
    Duplicate,
    Created {
        event: NotificationEvent,
        job_id: Option<Uuid>,
    },
}

/// Resolved preference state for one event type across every channel.
#[derive(Debug, Clone)]
pub struct ResolvedPreferences {
    pub event_type: EventType,
    pub channels: Vec<(Channel, bool)>,
}
