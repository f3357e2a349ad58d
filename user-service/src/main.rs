mod error;
mod handlers;
mod models;
mod routes;


use anyhow::Context;
use tokio::signal;
use userapi_shared::config::{DatabaseConfig, ServerConfig};
use userapi_shared::store::schema::initialize_database;

const DEFAULT_LOG_FILTER: &str = "info,userapi_user_service=debug,userapi_shared=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(true)
        .init();

    tracing::info!("User service starting");

    let server_config = ServerConfig::from_env().context("invalid server configuration")?;
    let db_config = DatabaseConfig::from_env();

    // The schema must exist before the listener accepts any request
    initialize_database(&db_config)
        .await
        .context("database initialization failed")?;

    let app = routes::create_router(&db_config);

    let listener = tokio::net::TcpListener::bind(server_config.addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.addr))?;
    tracing::info!("listening on {}", server_config.addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Service finished");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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

    tracing::info!("Shutdown signal received, draining connections");
}
