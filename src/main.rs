use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_backend::api::router;
use todo_backend::config::{self, Config};
use todo_backend::db::Store;
use todo_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config::log_filter_from_env()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = Store::connect(&config.database_url, config.max_connections).await?;

    let state = AppState { store: store.clone() };

    let app = router(state);

    let addr = config.addr();
    info!("listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => tracing::warn!("failed to listen for shutdown signal: {}", e),
    }
}
