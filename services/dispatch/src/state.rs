use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbDeliveryLogRepository, DbDispatchRepository, DbIdempotencyRepository, DbJobRepository,
    DbNotificationEventRepository, DbPreferenceRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn idempotency_repo(&self) -> DbIdempotencyRepository {
        DbIdempotencyRepository {
            db: self.db.clone(),
        }
    }

    pub fn job_repo(&self) -> DbJobRepository {
        DbJobRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_repo(&self) -> DbNotificationEventRepository {
        DbNotificationEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn delivery_log_repo(&self) -> DbDeliveryLogRepository {
        DbDeliveryLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn preference_repo(&self) -> DbPreferenceRepository {
        DbPreferenceRepository {
            db: self.db.clone(),
        }
    }

    pub fn dispatch_repo(&self) -> DbDispatchRepository {
        DbDispatchRepository {
            db: self.db.clone(),
        }
    }
}
