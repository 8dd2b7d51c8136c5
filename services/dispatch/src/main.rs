use sea_orm::Database;
use tracing::info;

use parkverse_core::tracing::init_tracing;
use parkverse_dispatch::config::DispatchConfig;
use parkverse_dispatch::router::build_router;
use parkverse_dispatch::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = DispatchConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.dispatch_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("dispatch service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
