use sea_orm::entity::prelude::*;

/// Notification event shown in the web tray and fanned out to channels.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub event_type: String,
    pub title: String,
    pub body: String,
    pub discord_message: Option<String>,
    pub metadata: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub dismissed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery_log::Entity")]
    DeliveryLog,
}

impl Related<super::delivery_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
