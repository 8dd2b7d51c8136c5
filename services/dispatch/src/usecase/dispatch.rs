use uuid::Uuid;

use parkverse_domain::delivery::{NOTIFICATION_DELIVERY_ROUTING_KEY, is_discord_user};
use parkverse_domain::notification::{Channel, EventType};

use crate::domain::repository::{DispatchRepository, PreferenceRepository};
use crate::domain::types::{
    DispatchStaged, NewNotificationEvent, NotificationEvent, PublishSpec,
};
use crate::error::DispatchServiceError;
use crate::usecase::preference::enabled_channels;

pub struct DispatchEventInput {
    /// Deterministic key for the originating action. When present the gate
    /// is consulted; a duplicate claim short-circuits the whole dispatch.
    pub idempotency_key: Option<String>,
    pub user_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub body: String,
    pub discord_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// What a dispatch produced, as seen by the producer.
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    /// The idempotency key was already claimed. Callers must treat this as
    /// success so retried HTTP calls stay safe.
    pub duplicate: bool,
    pub event: Option<NotificationEvent>,
    pub job_id: Option<Uuid>,
}

// ── DispatchEvent ────────────────────────────────────────────────────────────

pub struct DispatchEventUseCase<P, D>
where
    P: PreferenceRepository,
    D: DispatchRepository,
{
    pub preferences: P,
    pub dispatch: D,
}

impl<P, D> DispatchEventUseCase<P, D>
where
    P: PreferenceRepository,
    D: DispatchRepository,
{
    /// Producer-side dispatch: claim, persist, resolve channels, stage the
    /// broker message, track the job. Claim and publish commit in one
    /// storage transaction; the broker leg stays at-least-once with the
    /// consumer deduplicating on the key.
    pub async fn execute(
        &self,
        input: DispatchEventInput,
    ) -> Result<DispatchReceipt, DispatchServiceError> {
        if input.title.trim().is_empty() || input.body.trim().is_empty() {
            return Err(DispatchServiceError::MissingData);
        }

        let rows = self.preferences.fetch_for_user(input.user_id).await?;
        let eligible = enabled_channels(&rows, input.event_type);

        // Only the bot channels ride the broker; the web tray is the stored
        // event row itself. Site-local user ids have no Discord account.
        let discord_channels: Vec<Channel> = eligible
            .into_iter()
            .filter(|channel| channel.is_discord())
            .collect();
        let publish = (!discord_channels.is_empty() && is_discord_user(input.user_id)).then(|| {
            PublishSpec {
                routing_key: NOTIFICATION_DELIVERY_ROUTING_KEY.to_owned(),
                channels_to_deliver: discord_channels,
            }
        });

        let event = NewNotificationEvent {
            user_id: input.user_id,
            event_type: input.event_type,
            title: input.title,
            body: input.body,
            discord_message: input.discord_message,
            metadata: input.metadata,
        };

        let staged = self
            .dispatch
            .stage_dispatch(input.idempotency_key.as_deref(), &event, publish.as_ref())
            .await?;

        Ok(match staged {
            DispatchStaged::Duplicate => DispatchReceipt {
                duplicate: true,
                event: None,
                job_id: None,
            },
            DispatchStaged::Created { event, job_id } => DispatchReceipt {
                duplicate: false,
                event: Some(event),
                job_id,
            },
        })
    }
}
