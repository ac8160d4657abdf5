//! History worker: owns the periodic snapshot, retention, and TTL jobs.
//!
//! Explicit composition root: the pool and every background task are
//! constructed here and shut down here. No task registers itself through
//! module-level state.

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plotweave_history::background::{operation_ttl, snapshot_capture, snapshot_retention};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plotweave_worker=debug,plotweave_history=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")?;

    let pool = plotweave_db::create_pool(&database_url).await?;
    tracing::info!("Database connection pool created");

    plotweave_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    plotweave_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let cancel = CancellationToken::new();

    let capture = tokio::spawn(snapshot_capture::run(pool.clone(), cancel.clone()));
    let retention = tokio::spawn(snapshot_retention::run(pool.clone(), cancel.clone()));
    let ttl = tokio::spawn(operation_ttl::run(pool.clone(), cancel.clone()));

    tracing::info!("History worker started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping background jobs");
    cancel.cancel();

    // Each task finishes its current unit of work before exiting.
    let _ = tokio::join!(capture, retention, ttl);

    pool.close().await;
    tracing::info!("History worker stopped");

    Ok(())
}
