use dotenvy::dotenv;
use stand_core::observability::init_tracing;
use stand_frontend::config::get_configuration;
use stand_frontend::services::backend_client::BackendClient;
use stand_frontend::services::metrics::init_metrics;
use stand_frontend::startup::build_router;
use stand_frontend::AppState;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let observability = &configuration.observability;
    init_tracing(
        &observability.service_name,
        &observability.log_level,
        observability.otlp_endpoint.as_deref(),
    )?;

    init_metrics();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend_url = %configuration.backend.base_url,
        backend_timeout_seconds = configuration.backend.timeout_seconds,
        default_currency = %configuration.pricing.default_currency,
        "Configuration loaded"
    );

    let backend = Arc::new(BackendClient::new(&configuration.backend)?);
    let app = build_router(AppState::new(backend, configuration.pricing.clone()));

    let address = configuration.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting stand-frontend on {}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            anyhow::anyhow!("Server error: {}", e)
        })?;

    info!("Service shutdown complete");
    Ok(())
}
