//! Rollback engine: restore a plot to a prior snapshot under optimistic
//! concurrency, with an immutable audit trail.

use std::collections::{BTreeSet, HashMap};

use plotweave_core::error::CoreError;
use plotweave_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use plotweave_core::snapshot::SnapshotContent;
use plotweave_core::types::{DbId, Timestamp};
use plotweave_db::models::{NewSection, Plot, UserRef};
use plotweave_db::repositories::{
    PlotRepo, RollbackLogRepo, SectionRepo, SnapshotRepo, UserRepo,
};
use plotweave_db::DbPool;
use serde::Serialize;

use crate::error::{HistoryError, HistoryResult};

/// One rollback event in an audit listing, with its actor resolved.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackLogItem {
    pub id: DbId,
    pub plot_id: DbId,
    /// `None` once the referenced snapshot has been thinned away.
    pub snapshot_id: Option<DbId>,
    pub snapshot_version: i32,
    pub user: Option<UserRef>,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// Restore a plot to the state recorded in one of its snapshots.
///
/// The whole operation is a single transaction over an exclusively locked
/// plot row, so two concurrent rollbacks of the same plot serialize: the
/// second either proceeds against the bumped version or observes a
/// version conflict. Terminal outcomes:
///
/// - NotFound: plot absent, or snapshot absent / owned by another plot
/// - Forbidden: the plot is paused (rollbacks respect the editorial hold)
/// - Conflict: `expected_version` no longer matches the current version
/// - success: metadata overwritten from the payload (absent fields left
///   unchanged), all sections replaced with fresh identities, the version
///   counter bumped by exactly 1, and one audit entry appended
///
/// `expected_version = None` skips the optimistic check (unconditional
/// rollback).
pub async fn rollback_plot_to_snapshot(
    pool: &DbPool,
    plot_id: DbId,
    snapshot_id: DbId,
    user_id: DbId,
    expected_version: Option<i32>,
    reason: Option<&str>,
) -> HistoryResult<Plot> {
    let mut tx = pool.begin().await?;

    let plot = PlotRepo::find_for_update(&mut *tx, plot_id)
        .await?
        .ok_or_else(|| HistoryError::not_found("plot", plot_id))?;

    if plot.is_paused {
        return Err(HistoryError::Core(CoreError::Forbidden(
            "Plot is paused; rollback is not allowed".into(),
        )));
    }

    let snapshot = SnapshotRepo::find_by_id_and_plot(&mut *tx, snapshot_id, plot_id)
        .await?
        .ok_or_else(|| HistoryError::not_found("snapshot", snapshot_id))?;

    if let Some(expected) = expected_version {
        if expected != plot.version {
            return Err(HistoryError::Core(CoreError::Conflict(format!(
                "Version conflict: expected {expected}, current {}",
                plot.version
            ))));
        }
    }

    let content: SnapshotContent = serde_json::from_value(snapshot.content.clone())
        .map_err(|e| {
            CoreError::Internal(format!("Snapshot {snapshot_id} payload unreadable: {e}"))
        })?;

    let updated = PlotRepo::apply_snapshot_rollback(&mut *tx, plot_id, &content.plot).await?;

    let entries: Vec<NewSection> = content
        .sections
        .iter()
        .map(|section| NewSection {
            title: section.title.clone(),
            content: section.content.clone(),
            order_index: section.order_index,
            version: section.version,
        })
        .collect();
    SectionRepo::replace_all(&mut *tx, plot_id, &entries).await?;

    RollbackLogRepo::insert(
        &mut *tx,
        plot_id,
        snapshot.id,
        snapshot.version,
        user_id,
        reason,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        plot_id = %plot_id,
        snapshot_id = %snapshot_id,
        snapshot_version = snapshot.version,
        user_id = %user_id,
        new_version = updated.version,
        "Plot rolled back"
    );

    Ok(updated)
}

/// List a plot's rollback audit trail, newest first, with actors resolved
/// in one batch query.
pub async fn list_rollback_logs(
    pool: &DbPool,
    plot_id: DbId,
    limit: Option<i64>,
    offset: Option<i64>,
) -> HistoryResult<(Vec<RollbackLogItem>, i64)> {
    let limit = clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(offset);

    let total = RollbackLogRepo::count_by_plot(pool, plot_id).await?;
    let logs = RollbackLogRepo::list_by_plot(pool, plot_id, limit, offset).await?;

    let user_ids: Vec<DbId> = logs
        .iter()
        .map(|log| log.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let users: HashMap<DbId, UserRef> = UserRepo::resolve_many(pool, &user_ids)
        .await?
        .iter()
        .map(|user| (user.id, UserRef::from(user)))
        .collect();

    let items = logs
        .into_iter()
        .map(|log| RollbackLogItem {
            user: users.get(&log.user_id).cloned(),
            id: log.id,
            plot_id: log.plot_id,
            snapshot_id: log.snapshot_id,
            snapshot_version: log.snapshot_version,
            reason: log.reason,
            created_at: log.created_at,
        })
        .collect();

    Ok((items, total))
}
