use std::sync::Arc;

use anyhow::Context;

use shopdeck_api::app::{self, services};
use shopdeck_infra::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside local development.
    let _ = dotenvy::dotenv();
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => shopdeck_observability::init_pretty(),
        _ => shopdeck_observability::init(),
    }

    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;
    let services = Arc::new(services::build_services(&config).await?);
    let app = app::build_app(services, &config)?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
