//! Repository for the `cold_snapshots` table.
//!
//! Snapshots are written by the capture batch, read by rollback and diff,
//! and deleted by retention thinning (or plot cascade).

use plotweave_core::retention::SnapshotStamp;
use plotweave_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::snapshot::ColdSnapshot;

/// Column list for cold_snapshots queries.
const COLUMNS: &str = "id, plot_id, content, version, created_at";

/// Provides create, read, and retention-delete operations for snapshots.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Persist one snapshot, returning the created row.
    pub async fn insert(
        pool: &PgPool,
        plot_id: DbId,
        content: &serde_json::Value,
        version: i32,
    ) -> Result<ColdSnapshot, sqlx::Error> {
        let query = format!(
            "INSERT INTO cold_snapshots (plot_id, content, version)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ColdSnapshot>(&query)
            .bind(plot_id)
            .bind(content)
            .bind(version)
            .fetch_one(pool)
            .await
    }

    /// List a plot's snapshots, newest first.
    pub async fn list_by_plot(
        pool: &PgPool,
        plot_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ColdSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cold_snapshots
             WHERE plot_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ColdSnapshot>(&query)
            .bind(plot_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a plot's snapshots (pagination metadata).
    pub async fn count_by_plot(pool: &PgPool, plot_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cold_snapshots WHERE plot_id = $1")
            .bind(plot_id)
            .fetch_one(pool)
            .await
    }

    /// Find a snapshot by id, scoped to its owning plot.
    ///
    /// The plot scope guards against cross-plot id guessing: a snapshot id
    /// that exists under a different plot reads as absent.
    pub async fn find_by_id_and_plot(
        conn: &mut PgConnection,
        snapshot_id: DbId,
        plot_id: DbId,
    ) -> Result<Option<ColdSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cold_snapshots
             WHERE id = $1 AND plot_id = $2"
        );
        sqlx::query_as::<_, ColdSnapshot>(&query)
            .bind(snapshot_id)
            .bind(plot_id)
            .fetch_optional(conn)
            .await
    }

    /// Find the snapshot carrying a specific plot version.
    pub async fn find_by_plot_and_version(
        pool: &PgPool,
        plot_id: DbId,
        version: i32,
    ) -> Result<Option<ColdSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cold_snapshots
             WHERE plot_id = $1 AND version = $2
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ColdSnapshot>(&query)
            .bind(plot_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// All plot ids that currently have snapshots (drives the all-plots
    /// thinning pass).
    pub async fn distinct_plot_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT DISTINCT plot_id FROM cold_snapshots")
            .fetch_all(pool)
            .await
    }

    /// Fetch `(id, created_at)` stamps for one plot within an age range,
    /// newest first (the retention planner's input ordering).
    ///
    /// `newer_than = None` leaves the range unbounded below.
    pub async fn list_range_desc(
        pool: &PgPool,
        plot_id: DbId,
        older_than: Timestamp,
        newer_than: Option<Timestamp>,
    ) -> Result<Vec<SnapshotStamp>, sqlx::Error> {
        let rows: Vec<(DbId, Timestamp)> = match newer_than {
            Some(newer) => {
                sqlx::query_as(
                    "SELECT id, created_at FROM cold_snapshots
                     WHERE plot_id = $1 AND created_at < $2 AND created_at >= $3
                     ORDER BY created_at DESC",
                )
                .bind(plot_id)
                .bind(older_than)
                .bind(newer)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, created_at FROM cold_snapshots
                     WHERE plot_id = $1 AND created_at < $2
                     ORDER BY created_at DESC",
                )
                .bind(plot_id)
                .bind(older_than)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(id, created_at)| SnapshotStamp { id, created_at })
            .collect())
    }

    /// Batch-delete snapshots by id, returning the count.
    pub async fn delete_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM cold_snapshots WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
