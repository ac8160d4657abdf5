//! Hot operation model.
//!
//! Operations are immutable edit events in the hot tier, visible for 72
//! hours and then purged by TTL.

use plotweave_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `hot_operations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HotOperation {
    pub id: DbId,
    pub section_id: DbId,
    /// Free-form edit tag (`insert`, `delete`, `update`, ...).
    pub op_type: String,
    /// Opaque edit payload (position/content/length), owned by the editor.
    pub payload: Option<serde_json::Value>,
    pub user_id: DbId,
    /// The section's version after this edit.
    pub version: i32,
    pub created_at: Timestamp,
}
