use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::{info, warn};

use crate::config::Config;
use crate::{bootstrap, build_router, seed, AppState, ServiceKind};

/// Process entry point shared by both binaries: configure, bootstrap the
/// table, then serve until Ctrl+C or SIGTERM.
pub async fn run(kind: ServiceKind) -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,roster_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!(service = kind.api_name(), table = kind.table(), "Starting");

    // Lazy pool: the first real connection attempt happens inside the
    // bootstrap retry loop.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy(&config.database_url)
        .context("DATABASE_URL is not a valid Postgres connection string")?;

    bootstrap::ensure_schema(&pool, kind, config.bootstrap).await?;

    if config.seed_default_record {
        match kind {
            ServiceKind::Persons => {
                seed::seed_default_person(&pool).await?;
            }
            ServiceKind::Students => {
                warn!("SEED_DEFAULT_RECORD is set but the student service has no default record");
            }
        }
    }

    let app = build_router(AppState::new(pool.clone(), kind));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shut down cleanly.");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}
