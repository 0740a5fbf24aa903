use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use printshop::{
    middleware::auth::AuthGate,
    router::init_router,
    state::{AppState, build_sessions},
};
use printshop_cache::{CacheConfig, RedisSecretStore};
use printshop_config::{AccessTable, CorsConfig, SecurityConfig, ServerConfig};
use printshop_db::{DatabaseConfig, init_db_pool, run_migrations};
use printshop_observability::{init_metrics, init_tracing, shutdown_tracer};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let result = run().await;
    shutdown_tracer().await;
    result
}

async fn run() -> anyhow::Result<()> {
    let server_config = ServerConfig::from_env()?;
    let security = SecurityConfig::from_env()?;
    let access = AccessTable::from_env()?;
    info!(routes = access.len(), "Access table loaded");

    let db_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let db = init_db_pool(&db_config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&db).await.context("failed to run migrations")?;

    let store = RedisSecretStore::connect(&CacheConfig::from_env())
        .await
        .context("failed to connect to Redis")?;

    let sessions = build_sessions(db.clone(), Arc::new(store), &security);
    let gate = AuthGate::new(
        sessions.clone(),
        Arc::new(access),
        server_config.base_path.as_str(),
    );

    let state = AppState {
        db,
        sessions,
        gate,
        cors_config: CorsConfig::from_env(),
        server_config: server_config.clone(),
        metrics: init_metrics(),
    };
    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(%address, base_path = %server_config.base_path, "Server listening");
    info!("Swagger UI available at http://{address}/swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
