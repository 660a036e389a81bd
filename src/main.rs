mod clients;
mod error;
mod handlers;
mod models;
mod routes;
#[cfg(test)]
mod test_support;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clients::GeniusClient;
    use models::{AppConfig, AppState};

    init_tracing();

    let app_config = AppConfig::from_env()?;

    let http = reqwest::Client::builder()
        .timeout(app_config.upstream_timeout)
        .build()?;
    let lyrics = Arc::new(GeniusClient::new(http.clone(), &app_config));
    let app_state = AppState::new(app_config.clone(), http, lyrics);

    let app = routes::build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, frontend = %app_config.frontend_origin, "listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
