//! Plot model.
//!
//! A plot is the top-level versioned entity. Its `version` column counts
//! rollback operations (optimistic-locking counter, starts at 0); the
//! per-section edit counter lives on `sections.version`.

use plotweave_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `plots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plot {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<serde_json::Value>,
    pub owner_id: DbId,
    pub is_paused: bool,
    pub pause_reason: Option<String>,
    pub version: i32,
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
