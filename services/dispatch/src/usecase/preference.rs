use parkverse_domain::legacy::LegacyFlag;
use parkverse_domain::notification::{Channel, EventType, default_channels};

use crate::domain::repository::PreferenceRepository;
use crate::domain::types::{PreferenceRow, ResolvedPreferences};
use crate::error::DispatchServiceError;

/// Resolve one `(event type, channel)` cell: an explicit row wins, otherwise
/// membership in the type's default channel set.
fn resolve(explicit: &[PreferenceRow], event_type: EventType, channel: Channel) -> bool {
    explicit
        .iter()
        .find(|row| row.event_type == event_type && row.channel == channel)
        .map(|row| row.enabled)
        .unwrap_or_else(|| default_channels(event_type).contains(&channel))
}

/// Channels a notification of `event_type` should go out on for this user.
pub fn enabled_channels(explicit: &[PreferenceRow], event_type: EventType) -> Vec<Channel> {
    Channel::ALL
        .into_iter()
        .filter(|channel| resolve(explicit, event_type, *channel))
        .collect()
}

// ── ShouldDeliver ────────────────────────────────────────────────────────────

pub struct ShouldDeliverUseCase<R: PreferenceRepository> {
    pub repo: R,
}

impl<R: PreferenceRepository> ShouldDeliverUseCase<R> {
    pub async fn execute(
        &self,
        user_id: i64,
        event_type: EventType,
        channel: Channel,
    ) -> Result<bool, DispatchServiceError> {
        let rows = self.repo.fetch_for_user(user_id).await?;
        Ok(resolve(&rows, event_type, channel))
    }
}

// ── GetPreferences ───────────────────────────────────────────────────────────

pub struct GetPreferencesUseCase<R: PreferenceRepository> {
    pub repo: R,
}

impl<R: PreferenceRepository> GetPreferencesUseCase<R> {
    /// The full grid — every event type, every channel — resolved through
    /// the same default-then-override rule as delivery itself.
    pub async fn execute(
        &self,
        user_id: i64,
    ) -> Result<Vec<ResolvedPreferences>, DispatchServiceError> {
        let rows = self.repo.fetch_for_user(user_id).await?;
        Ok(EventType::ALL
            .into_iter()
            .map(|event_type| ResolvedPreferences {
                event_type,
                channels: Channel::ALL
                    .into_iter()
                    .map(|channel| (channel, resolve(&rows, event_type, channel)))
                    .collect(),
            })
            .collect())
    }
}

// ── BulkUpdatePreferences ────────────────────────────────────────────────────

pub struct PreferenceUpdate {
    pub event_type: EventType,
    pub channel: Channel,
    pub enabled: bool,
}

pub struct BulkUpdatePreferencesUseCase<R: PreferenceRepository> {
    pub repo: R,
}

impl<R: PreferenceRepository> BulkUpdatePreferencesUseCase<R> {
    /// Entries are upserted independently, in order, outside any transaction:
    /// a failure aborts the remainder but already-applied entries persist.
    pub async fn execute(
        &self,
        user_id: i64,
        updates: Vec<PreferenceUpdate>,
    ) -> Result<(), DispatchServiceError> {
        for update in updates {
            self.repo
                .upsert(&PreferenceRow {
                    user_id,
                    event_type: update.event_type,
                    channel: update.channel,
                    enabled: update.enabled,
                })
                .await?;
        }
        Ok(())
    }
}

// ── LegacyBitmask ────────────────────────────────────────────────────────────

pub struct LegacyBitmaskUseCase<R: PreferenceRepository> {
    pub repo: R,
}

impl<R: PreferenceRepository> LegacyBitmaskUseCase<R> {
    /// Pack the resolved state of the eight bot-era flags into one integer.
    pub async fn execute(&self, user_id: i64) -> Result<u32, DispatchServiceError> {
        let rows = self.repo.fetch_for_user(user_id).await?;
        let mut bitmask = 0;
        for flag in LegacyFlag::ALL {
            let (event_type, channel) = flag.mapping();
            if resolve(&rows, event_type, channel) {
                bitmask |= flag.bit();
            }
        }
        Ok(bitmask)
    }
}
