//! Periodic purge of expired hot operations.
//!
//! Deletes operations past the 72-hour TTL. Runs on its own interval,
//! independent of the snapshot scheduler.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::operations::purge_expired;

/// Default purge interval: 6 hours.
const DEFAULT_INTERVAL_SECS: u64 = 6 * 3600;

/// Run the hot-operation TTL purge loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("OPERATION_TTL_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Operation TTL purge job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Operation TTL purge job stopping");
                break;
            }
            _ = interval.tick() => {
                match purge_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Operation TTL purge: removed expired rows");
                        } else {
                            tracing::debug!("Operation TTL purge: nothing expired");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Operation TTL purge failed");
                    }
                }
            }
        }
    }
}
