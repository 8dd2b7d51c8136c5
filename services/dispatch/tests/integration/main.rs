mod helpers;

mod idempotency_test;
mod job_test;
mod preference_test;
