use std::net::SocketAddr;
use std::sync::Arc;

use service_core::observability::logging::init_tracing;
use storefront_service::{
    build_router,
    config::StorefrontConfig,
    services::SmtpNotifier,
    store::PgStore,
    AppState,
};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = StorefrontConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting storefront service"
    );

    let store = PgStore::connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .map_err(|e| service_core::error::AppError::DatabaseError(anyhow::anyhow!(e.to_string())))?;

    store
        .run_migrations()
        .await
        .map_err(|e| service_core::error::AppError::DatabaseError(anyhow::anyhow!(e.to_string())))?;
    tracing::info!("Database initialized successfully");

    let notifier = SmtpNotifier::new(&config.smtp)
        .map_err(|e| service_core::error::AppError::InternalError(anyhow::anyhow!(e.to_string())))?;
    tracing::info!("Notifier initialized");

    let state = AppState::new(config.clone(), Arc::new(store), Arc::new(notifier));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    service_core::axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
