//! Retention thinning: shrink snapshot density as snapshots age.
//!
//! The planning itself lives in `plotweave_core::retention`; this module
//! feeds it per-plot age ranges and executes the batch deletes.

use chrono::Utc;
use plotweave_core::retention::{
    plan_thinning, BucketGranularity, FULL_FIDELITY_DAYS, HOURLY_FIDELITY_DAYS,
};
use plotweave_core::types::DbId;
use plotweave_db::repositories::SnapshotRepo;
use plotweave_db::DbPool;

use crate::error::HistoryResult;

/// Apply the retention policy to one plot, or to every plot that has
/// snapshots.
///
/// In all-plots mode a failing plot is logged and skipped so it cannot
/// starve the others; for a single plot the error propagates. Returns the
/// number of snapshots deleted.
pub async fn thin_snapshots(pool: &DbPool, plot_id: Option<DbId>) -> HistoryResult<u64> {
    let plot_ids = match plot_id {
        Some(id) => return thin_plot(pool, id).await,
        None => SnapshotRepo::distinct_plot_ids(pool).await?,
    };

    let mut total_deleted = 0u64;
    for id in plot_ids {
        match thin_plot(pool, id).await {
            Ok(deleted) => total_deleted += deleted,
            Err(e) => {
                tracing::error!(plot_id = %id, error = %e, "Snapshot thinning failed");
            }
        }
    }

    if total_deleted > 0 {
        tracing::info!(deleted = total_deleted, "Snapshot thinning complete");
    }

    Ok(total_deleted)
}

/// Thin one plot's snapshots across both age ranges.
async fn thin_plot(pool: &DbPool, plot_id: DbId) -> HistoryResult<u64> {
    let now = Utc::now();
    let full_fidelity_cutoff = now - chrono::Duration::days(FULL_FIDELITY_DAYS);
    let hourly_cutoff = now - chrono::Duration::days(HOURLY_FIDELITY_DAYS);

    let mut deleted = 0u64;

    // 7-30 days old: one snapshot per hour.
    let stamps =
        SnapshotRepo::list_range_desc(pool, plot_id, full_fidelity_cutoff, Some(hourly_cutoff))
            .await?;
    let plan = plan_thinning(&stamps, BucketGranularity::Hour);
    deleted += SnapshotRepo::delete_by_ids(pool, &plan).await?;

    // 30+ days old: one snapshot per day.
    let stamps = SnapshotRepo::list_range_desc(pool, plot_id, hourly_cutoff, None).await?;
    let plan = plan_thinning(&stamps, BucketGranularity::Day);
    deleted += SnapshotRepo::delete_by_ids(pool, &plan).await?;

    Ok(deleted)
}
