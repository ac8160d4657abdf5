//! Section model.

use plotweave_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sections` table.
///
/// `version` counts content edits and starts at 1. Only the operation log
/// may increment it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub plot_id: DbId,
    pub title: String,
    pub content: Option<serde_json::Value>,
    pub order_index: i32,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for recreating a plot's sections during rollback.
///
/// Carries no id: restored sections always get fresh identities so that
/// stale references to pre-rollback sections dangle instead of silently
/// pointing at restored content.
#[derive(Debug, Clone)]
pub struct NewSection {
    pub title: String,
    pub content: Option<serde_json::Value>,
    pub order_index: i32,
    pub version: i32,
}
