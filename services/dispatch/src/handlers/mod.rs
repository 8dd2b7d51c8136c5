pub mod idempotency;
pub mod job;
pub mod notification;
pub mod preference;
