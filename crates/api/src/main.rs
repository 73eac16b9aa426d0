use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use subtrack_api::config::{ServerConfig, StorageBackend};
use subtrack_api::router::build_app_router;
use subtrack_api::state::AppState;
use subtrack_api::telemetry;
use subtrack_core::store::{MemoryStore, SubscriptionStore};
use subtrack_db::store::PgSubscriptionStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Loaded server configuration",
    );

    // --- Storage ---
    let store = connect_store(&config).await;

    // --- Router ---
    let state = AppState::new(store);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    // In-flight requests get `shutdown_timeout_secs` to drain once a signal
    // arrives; after that the process exits regardless.
    tokio::select! {
        result = &mut server => result.expect("Server error"),
        _ = signalled_rx => {
            let drain = Duration::from_secs(config.shutdown_timeout_secs);
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => result.expect("Server error"),
                Err(_) => tracing::warn!(
                    timeout_secs = config.shutdown_timeout_secs,
                    "Shutdown timeout elapsed with requests still in flight",
                ),
            }
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Build the configured subscription store.
///
/// For PostgreSQL this connects, verifies the connection and applies
/// pending migrations; any failure aborts startup.
async fn connect_store(config: &ServerConfig) -> Arc<dyn SubscriptionStore> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database
                .url
                .as_deref()
                .expect("DATABASE_URL or DB_HOST must be set");

            let pool = subtrack_db::create_pool(database_url, config.database.max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            subtrack_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            subtrack_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgSubscriptionStore::new(pool))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
