use sea_orm::entity::prelude::*;

/// Tracked unit of asynchronous work dispatched to the delivery worker.
///
/// `error_code`/`error_msg` are non-null only while `status` is `failed`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub action: String,
    pub status: String,
    pub attempts: i32,
    pub result: Option<Json>,
    pub error_code: Option<String>,
    pub error_msg: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
