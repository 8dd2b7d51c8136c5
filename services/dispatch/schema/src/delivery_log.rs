use sea_orm::entity::prelude::*;

/// Most recent delivery outcome per `(event, channel)`. Re-attempts
/// overwrite the row; there is never more than one per pair.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub channel: String,
    pub status: String,
    pub attempted_at: chrono::DateTime<chrono::Utc>,
    pub delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::notification_events::Entity",
        from = "Column::EventId",
        to = "super::notification_events::Column::Id"
    )]
    NotificationEvent,
}

impl Related<super::notification_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
