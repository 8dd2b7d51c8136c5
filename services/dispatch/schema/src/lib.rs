//! sea-orm entities for the dispatch service tables.

pub mod delivery_log;
pub mod idempotency_claims;
pub mod jobs;
pub mod notification_events;
pub mod notification_preferences;
pub mod outbox_messages;
