//! Periodic plot snapshot capture.
//!
//! Spawns a background task that snapshots every plot touched since the
//! previous tick. Runs on a fixed interval using `tokio::time::interval`;
//! rapid edits within one window collapse into a single snapshot.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::snapshots::run_capture_batch;

/// Default capture interval: 5 minutes.
const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Run the snapshot capture loop.
///
/// The window handed to each batch equals the interval, so a plot edited
/// at any point between two ticks is picked up by the next one. Runs
/// until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("SNAPSHOT_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    tracing::info!(interval_secs, "Snapshot capture job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Snapshot capture job stopping");
                break;
            }
            _ = interval.tick() => {
                let window = chrono::Duration::seconds(interval_secs as i64);
                match run_capture_batch(&pool, window).await {
                    Ok(created) => {
                        if created > 0 {
                            tracing::debug!(created, "Snapshot capture tick done");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Snapshot capture batch failed");
                    }
                }
            }
        }
    }
}
