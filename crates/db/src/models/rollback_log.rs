//! Rollback log model.
//!
//! Append-only audit trail of rollback events. Entries are never thinned;
//! they outlive the snapshot they reference (weak reference, nulled on
//! snapshot deletion, with the version denormalized alongside).

use plotweave_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `rollback_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RollbackLog {
    pub id: DbId,
    pub plot_id: DbId,
    /// Nulled by the database when the referenced snapshot is deleted.
    pub snapshot_id: Option<DbId>,
    /// Preserved even after the snapshot is gone.
    pub snapshot_version: i32,
    pub user_id: DbId,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}
