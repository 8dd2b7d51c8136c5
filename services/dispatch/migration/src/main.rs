use sea_orm_migration::prelude::*;

mod m20260801_000001_create_idempotency_claims;
mod m20260801_000002_create_jobs;
mod m20260801_000003_create_notification_events;
mod m20260801_000004_create_delivery_log;
mod m20260801_000005_create_notification_preferences;
mod m20260801_000006_create_outbox_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_idempotency_claims::Migration),
            Box::new(m20260801_000002_create_jobs::Migration),
            Box::new(m20260801_000003_create_notification_events::Migration),
            Box::new(m20260801_000004_create_delivery_log::Migration),
            Box::new(m20260801_000005_create_notification_preferences::Migration),
            Box::new(m20260801_000006_create_outbox_messages::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
