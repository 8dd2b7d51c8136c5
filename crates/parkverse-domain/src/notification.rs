//! Notification event types, delivery channels, and the default-channel table.

use serde::{Deserialize, Serialize};

/// Closed enumeration of notification event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    // Completion/record events
    VerificationApproved,
    VerificationRejected,
    RecordRemoved,
    RecordEdited,
    // Progression events
    SkillRoleUpdate,
    XpGain,
    RankUp,
    Prestige,
    MasteryEarned,
    // Reward events
    LootboxEarned,
    // Engagement events
    PlaytestUpdate,
    // Map edit events
    MapEditApproved,
    MapEditRejected,
}

impl EventType {
    /// Every variant, in declaration order. Used to build full preference grids.
    pub const ALL: [EventType; 13] = [
        Self::VerificationApproved,
        Self::VerificationRejected,
        Self::RecordRemoved,
        Self::RecordEdited,
        Self::SkillRoleUpdate,
        Self::XpGain,
        Self::RankUp,
        Self::Prestige,
        Self::MasteryEarned,
        Self::LootboxEarned,
        Self::PlaytestUpdate,
        Self::MapEditApproved,
        Self::MapEditRejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VerificationApproved => "verification_approved",
            Self::VerificationRejected => "verification_rejected",
            Self::RecordRemoved => "record_removed",
            Self::RecordEdited => "record_edited",
            Self::SkillRoleUpdate => "skill_role_update",
            Self::XpGain => "xp_gain",
            Self::RankUp => "rank_up",
            Self::Prestige => "prestige",
            Self::MasteryEarned => "mastery_earned",
            Self::LootboxEarned => "lootbox_earned",
            Self::PlaytestUpdate => "playtest_update",
            Self::MapEditApproved => "map_edit_approved",
            Self::MapEditRejected => "map_edit_rejected",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

/// Channels a notification can be delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    DiscordDm,
    DiscordPing,
    Web,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Self::DiscordDm, Self::DiscordPing, Self::Web];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DiscordDm => "discord_dm",
            Self::DiscordPing => "discord_ping",
            Self::Web => "web",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }

    /// Whether delivery on this channel goes through the Discord bot.
    pub fn is_discord(self) -> bool {
        matches!(self, Self::DiscordDm | Self::DiscordPing)
    }
}

/// Channels that receive an event type absent an explicit user preference.
///
/// Immutable compatibility table — changing an entry changes what every user
/// without an explicit preference row receives.
pub fn default_channels(event_type: EventType) -> &'static [Channel] {
    const DM_WEB: &[Channel] = &[Channel::DiscordDm, Channel::Web];
    const PING_WEB: &[Channel] = &[Channel::DiscordPing, Channel::Web];

    match event_type {
        EventType::VerificationApproved
        | EventType::VerificationRejected
        | EventType::RecordRemoved
        | EventType::SkillRoleUpdate
        | EventType::LootboxEarned
        | EventType::PlaytestUpdate
        | EventType::MapEditApproved
        | EventType::MapEditRejected => DM_WEB,
        EventType::XpGain | EventType::RankUp | EventType::Prestige | EventType::MasteryEarned => {
            PING_WEB
        }
        // Record edits are tray-only opt-in; no default channels.
        EventType::RecordEdited => &[],
    }
}

/// Outcome of a single delivery attempt on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Failed,
    Skipped,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "delivered" => Some(Self::Delivered),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}
