//! Eventboard API Server
//!
//! Serves the RSVP, photo and ping resources until Ctrl+C or SIGTERM.

use std::sync::Arc;

use eventboard_api::{
    config::{DatabaseConfig, ServerConfig},
    db::{schema::ensure_schema, PgGateway},
    logging::{init_tracing, LogFile},
    supervisor::Supervisor,
    ResultExt,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // The log directory comes from config, so this is read before logging starts
    let server_config = ServerConfig::from_env()?;

    let log_file = LogFile::open(&server_config.log_dir)?;
    init_tracing(&log_file)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_file.path().display(),
        "Starting Eventboard API"
    );

    let db_config = DatabaseConfig::from_env().log("Loading database configuration")?;
    let gateway = Arc::new(PgGateway::new(&db_config).log("Creating database gateway")?);

    if db_config.auto_migrate {
        ensure_schema(gateway.as_ref())
            .await
            .log("Creating database schema")?;
    }

    tracing::info!(
        host = %server_config.host,
        port = server_config.port,
        require_api_key = server_config.require_api_key,
        "Configuration loaded"
    );

    let supervisor =
        Supervisor::new(server_config, gateway.clone()).log("Creating supervisor")?;
    let result = supervisor.run(shutdown_signal()).await.log("Supervisor stopped");

    gateway.close().await;
    tracing::info!("Server shutdown complete");
    log_file.close()?;

    result?;
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
