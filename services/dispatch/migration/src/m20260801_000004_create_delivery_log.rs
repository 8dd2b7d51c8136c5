use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryLog::EventId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryLog::Channel).string().not_null())
                    .col(ColumnDef::new(DeliveryLog::Status).string().not_null())
                    .col(
                        ColumnDef::new(DeliveryLog::AttemptedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(DeliveryLog::DeliveredAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(DeliveryLog::ErrorMessage).string())
                    .primary_key(
                        Index::create()
                            .col(DeliveryLog::EventId)
                            .col(DeliveryLog::Channel),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DeliveryLog::Table, DeliveryLog::EventId)
                            .to(NotificationEvents::Table, NotificationEvents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DeliveryLog {
    Table,
    EventId,
    Channel,
    Status,
    AttemptedAt,
    DeliveredAt,
    ErrorMessage,
}

#[derive(Iden)]
enum NotificationEvents {
    Table,
    Id,
}
