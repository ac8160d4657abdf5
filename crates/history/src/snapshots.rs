//! Cold snapshot store: plot-wide state capture and reads.
//!
//! Captures run from the background batch, not per edit: many rapid edits
//! within one scheduler window collapse into a single snapshot.

use plotweave_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use plotweave_core::snapshot::{
    within_size_cap, Patch, PlotMeta, SectionSnapshot, SnapshotContent,
};
use plotweave_core::types::DbId;
use plotweave_db::models::{ColdSnapshot, Plot};
use plotweave_db::repositories::{PlotRepo, SectionRepo, SnapshotRepo};
use plotweave_db::DbPool;

use crate::error::{HistoryError, HistoryResult};

/// What happened to one plot's capture attempt.
#[derive(Debug)]
pub enum CaptureOutcome {
    Created(ColdSnapshot),
    /// The serialized payload exceeded the size cap. Deliberate
    /// backpressure, not an error: the plot stays eligible next tick.
    Skipped { size_bytes: usize },
}

/// Capture one plot's full state into a cold snapshot.
///
/// The payload records the plot metadata and every section in document
/// order, tagged with the plot's current version. Oversized payloads are
/// skipped whole, never truncated.
pub async fn capture_plot(pool: &DbPool, plot: &Plot) -> HistoryResult<CaptureOutcome> {
    let sections = SectionRepo::list_by_plot(pool, plot.id).await?;

    let content = SnapshotContent {
        plot: PlotMeta {
            title: Patch::Value(plot.title.clone()),
            description: match &plot.description {
                Some(description) => Patch::Value(description.clone()),
                None => Patch::Null,
            },
            tags: Patch::Value(
                plot.tags.clone().unwrap_or_else(|| serde_json::json!([])),
            ),
        },
        sections: sections
            .into_iter()
            .map(|section| SectionSnapshot {
                id: Some(section.id),
                title: section.title,
                content: section.content,
                order_index: section.order_index,
                version: section.version,
            })
            .collect(),
    };

    let payload = serde_json::to_value(&content)
        .map_err(|e| plotweave_core::error::CoreError::Internal(e.to_string()))?;
    let size_bytes = payload.to_string().len();

    if !within_size_cap(size_bytes) {
        tracing::warn!(
            plot_id = %plot.id,
            size_bytes,
            "Snapshot exceeds size cap, skipping capture"
        );
        return Ok(CaptureOutcome::Skipped { size_bytes });
    }

    let snapshot = SnapshotRepo::insert(pool, plot.id, &payload, plot.version).await?;
    tracing::debug!(
        plot_id = %plot.id,
        snapshot_id = %snapshot.id,
        version = snapshot.version,
        "Snapshot captured"
    );

    Ok(CaptureOutcome::Created(snapshot))
}

/// Run one capture batch: snapshot every plot touched within `window`.
///
/// One plot's failure never aborts the batch; it is logged and the batch
/// moves on. Returns the number of snapshots created.
pub async fn run_capture_batch(pool: &DbPool, window: chrono::Duration) -> HistoryResult<usize> {
    let cutoff = chrono::Utc::now() - window;
    let plots = PlotRepo::touched_since(pool, cutoff).await?;
    let candidates = plots.len();

    let mut created = 0usize;
    for plot in &plots {
        match capture_plot(pool, plot).await {
            Ok(CaptureOutcome::Created(_)) => created += 1,
            Ok(CaptureOutcome::Skipped { .. }) => {}
            Err(e) => {
                tracing::error!(plot_id = %plot.id, error = %e, "Snapshot capture failed");
            }
        }
    }

    if created > 0 {
        tracing::info!(created, candidates, "Snapshot batch complete");
    }

    Ok(created)
}

/// List a plot's snapshots, newest first, with the total count.
pub async fn list_snapshots(
    pool: &DbPool,
    plot_id: DbId,
    limit: Option<i64>,
    offset: Option<i64>,
) -> HistoryResult<(Vec<ColdSnapshot>, i64)> {
    let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(offset);

    let total = SnapshotRepo::count_by_plot(pool, plot_id).await?;
    let snapshots = SnapshotRepo::list_by_plot(pool, plot_id, limit, offset).await?;

    Ok((snapshots, total))
}

/// Fetch one snapshot for preview before rollback.
///
/// Fails with NotFound when the snapshot does not exist or belongs to a
/// different plot.
pub async fn get_snapshot_detail(
    pool: &DbPool,
    plot_id: DbId,
    snapshot_id: DbId,
) -> HistoryResult<ColdSnapshot> {
    let mut conn = pool.acquire().await?;
    SnapshotRepo::find_by_id_and_plot(&mut conn, snapshot_id, plot_id)
        .await?
        .ok_or_else(|| HistoryError::not_found("snapshot", snapshot_id))
}
