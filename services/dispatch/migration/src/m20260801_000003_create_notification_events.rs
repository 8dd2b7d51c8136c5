use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationEvents::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationEvents::EventType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NotificationEvents::Title).string().not_null())
                    .col(ColumnDef::new(NotificationEvents::Body).string().not_null())
                    .col(ColumnDef::new(NotificationEvents::DiscordMessage).string())
                    .col(ColumnDef::new(NotificationEvents::Metadata).json_binary())
                    .col(
                        ColumnDef::new(NotificationEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(NotificationEvents::ReadAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(NotificationEvents::DismissedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(NotificationEvents::Table)
                    .col(NotificationEvents::UserId)
                    .col((NotificationEvents::CreatedAt, IndexOrder::Desc))
                    .name("idx_notification_events_user_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NotificationEvents {
    Table,
    Id,
    UserId,
    EventType,
    Title,
    Body,
    DiscordMessage,
    Metadata,
    CreatedAt,
    ReadAt,
    DismissedAt,
}
