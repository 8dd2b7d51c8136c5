//! Legacy preference bitmask compatibility contract.
//!
//! The Discord bot predates the preference table and still reads a single
//! integer of notification flags. Each flag maps onto one
//! `(event type, channel)` pair in the new model. The bit values below are a
//! wire format shared with the bot — never renumber them.

use crate::notification::{Channel, EventType};

/// Bot-era notification flags with their original bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LegacyFlag {
    DmOnVerification = 1,
    DmOnSkillRoleUpdate = 2,
    DmOnLootboxGain = 4,
    DmOnRecordsRemoval = 8,
    DmOnPlaytestAlerts = 16,
    PingOnXpGain = 32,
    PingOnMastery = 64,
    PingOnCommunityRankUpdate = 128,
}

impl LegacyFlag {
    pub const ALL: [LegacyFlag; 8] = [
        Self::DmOnVerification,
        Self::DmOnSkillRoleUpdate,
        Self::DmOnLootboxGain,
        Self::DmOnRecordsRemoval,
        Self::DmOnPlaytestAlerts,
        Self::PingOnXpGain,
        Self::PingOnMastery,
        Self::PingOnCommunityRankUpdate,
    ];

    pub fn bit(self) -> u32 {
        self as u32
    }

    /// The `(event type, channel)` pair this flag resolves through in the
    /// preference table.
    pub fn mapping(self) -> (EventType, Channel) {
        match self {
            Self::DmOnVerification => (EventType::VerificationApproved, Channel::DiscordDm),
            Self::DmOnSkillRoleUpdate => (EventType::SkillRoleUpdate, Channel::DiscordDm),
            Self::DmOnLootboxGain => (EventType::LootboxEarned, Channel::DiscordDm),
            Self::DmOnRecordsRemoval => (EventType::RecordRemoved, Channel::DiscordDm),
            Self::DmOnPlaytestAlerts => (EventType::PlaytestUpdate, Channel::DiscordDm),
            Self::PingOnXpGain => (EventType::XpGain, Channel::DiscordPing),
            Self::PingOnMastery => (EventType::MasteryEarned, Channel::DiscordPing),
            Self::PingOnCommunityRankUpdate => (EventType::RankUp, Channel::DiscordPing),
        }
    }
}
