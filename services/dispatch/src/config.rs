/// Dispatch service configuration loaded from environment variables.
#[derive(Debug)]
pub struct DispatchConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `DISPATCH_PORT`.
    pub dispatch_port: u16,
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            dispatch_port: std::env::var("DISPATCH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
        }
    }
}
