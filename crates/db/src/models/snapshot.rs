//! Cold snapshot model.
//!
//! Snapshots are immutable plot-wide state captures created by the batch
//! scheduler and deleted only by retention thinning or plot cascade.

use plotweave_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `cold_snapshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ColdSnapshot {
    pub id: DbId,
    pub plot_id: DbId,
    /// Self-describing payload; see `plotweave_core::snapshot::SnapshotContent`.
    pub content: serde_json::Value,
    /// The plot's version at capture time.
    pub version: i32,
    pub created_at: Timestamp,
}
