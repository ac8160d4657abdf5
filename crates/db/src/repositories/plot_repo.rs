//! Repository for the `plots` table.
//!
//! The history system reads plots for capture and mutates them only
//! through [`PlotRepo::apply_snapshot_rollback`], which is the single
//! place the plot version counter is incremented.

use plotweave_core::snapshot::PlotMeta;
use plotweave_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::plot::Plot;

/// Column list for plots queries.
const COLUMNS: &str = "id, title, description, tags, owner_id, is_paused, \
    pause_reason, version, thumbnail_url, created_at, updated_at";

/// Provides read and rollback-write operations for plots.
pub struct PlotRepo;

impl PlotRepo {
    /// Find a plot by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Plot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plots WHERE id = $1");
        sqlx::query_as::<_, Plot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a plot with an exclusive row lock, inside the caller's
    /// transaction.
    ///
    /// Serializes concurrent rollbacks of the same plot: the second caller
    /// blocks here until the first commits, then observes the bumped
    /// version.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Plot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plots WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Plot>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List plots whose metadata or sections were touched at or after
    /// `cutoff` (candidates for the next snapshot batch).
    pub async fn touched_since(pool: &PgPool, cutoff: Timestamp) -> Result<Vec<Plot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM plots
             WHERE updated_at >= $1
                OR id IN (SELECT plot_id FROM sections WHERE updated_at >= $1)"
        );
        sqlx::query_as::<_, Plot>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// Overwrite plot metadata from a snapshot payload and bump the
    /// rollback counter by exactly 1, returning the updated row.
    ///
    /// Only fields present in the payload are touched: absent fields stay
    /// unchanged, explicit nulls clear the column. Tolerates snapshots
    /// captured under an older payload schema.
    pub async fn apply_snapshot_rollback(
        conn: &mut PgConnection,
        id: DbId,
        meta: &PlotMeta,
    ) -> Result<Plot, sqlx::Error> {
        let mut sets: Vec<String> = vec![
            "version = version + 1".into(),
            "updated_at = now()".into(),
        ];
        let mut bind_idx = 2u32; // $1 is the plot id
        let mut text_binds: Vec<Option<&str>> = Vec::new();
        let mut tags_bind: Option<Option<serde_json::Value>> = None;

        if let Some(title) = meta.title.to_update() {
            sets.push(format!("title = ${bind_idx}"));
            bind_idx += 1;
            text_binds.push(title.map(String::as_str));
        }
        if let Some(description) = meta.description.to_update() {
            sets.push(format!("description = ${bind_idx}"));
            bind_idx += 1;
            text_binds.push(description.map(String::as_str));
        }
        if let Some(tags) = meta.tags.to_update() {
            sets.push(format!("tags = ${bind_idx}"));
            tags_bind = Some(tags.cloned());
        }

        let query = format!(
            "UPDATE plots SET {} WHERE id = $1 RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Plot>(&query).bind(id);
        for value in &text_binds {
            q = q.bind(*value);
        }
        if let Some(tags) = &tags_bind {
            q = q.bind(tags.clone());
        }

        q.fetch_one(conn).await
    }
}
