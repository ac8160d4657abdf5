//! Daily snapshot retention thinning.
//!
//! Applies the tiered retention policy to every plot once a day at a
//! fixed UTC hour, after the day's captures have accumulated.

use chrono::{Timelike, Utc};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::retention::thin_snapshots;

/// Default fire hour: 03:00 UTC.
const DEFAULT_HOUR_UTC: u32 = 3;

/// Run the snapshot retention loop.
///
/// Sleeps until the next occurrence of the configured UTC hour, thins,
/// and repeats. Runs until `cancel` is triggered; an in-flight pass is
/// finished before stopping.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let hour_utc: u32 = std::env::var("RETENTION_HOUR_UTC")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|h| *h < 24)
        .unwrap_or(DEFAULT_HOUR_UTC);

    tracing::info!(hour_utc, "Snapshot retention job started");

    loop {
        let wait = duration_until_hour(Utc::now(), hour_utc);

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Snapshot retention job stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                match thin_snapshots(&pool, None).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Snapshot retention: thinned old snapshots");
                        } else {
                            tracing::debug!("Snapshot retention: nothing to thin");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Snapshot retention pass failed");
                    }
                }
            }
        }
    }
}

/// Time from `now` until the next occurrence of `hour:00:00` UTC.
///
/// If `now` is already past today's fire time (or exactly on it), the
/// next occurrence is tomorrow.
fn duration_until_hour(now: chrono::DateTime<Utc>, hour: u32) -> std::time::Duration {
    let mut target = now
        .with_hour(hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    if target <= now {
        target += chrono::Duration::days(1);
    }

    (target - now).to_std().unwrap_or_default()
}
