//! Broker message contract between the API producer and the delivery worker.

use serde::{Deserialize, Serialize};

use crate::notification::{Channel, EventType};

/// Routing key for notification delivery messages.
pub const NOTIFICATION_DELIVERY_ROUTING_KEY: &str = "api.notification.delivery";

/// Smallest valid Discord snowflake id. Accounts below this are site-local
/// (fake) users the bot cannot reach.
pub const DISCORD_USER_ID_LOWER_LIMIT: i64 = 1_000_000_000_000_000;

/// Whether a user id is a Discord snowflake the bot can deliver to.
pub fn is_discord_user(user_id: i64) -> bool {
    user_id >= DISCORD_USER_ID_LOWER_LIMIT
}

/// One staged delivery, carrying the full eligible-channel set.
///
/// Consumers receive this at-least-once; the idempotency key travels as a
/// message attribute next to the body, not inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryMessage {
    pub event_id: i64,
    pub user_id: i64,
    pub event_type: EventType,
    pub title: String,
    pub body: String,
    pub discord_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub channels_to_deliver: Vec<Channel>,
}
