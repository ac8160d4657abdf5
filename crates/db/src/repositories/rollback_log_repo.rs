//! Repository for the `rollback_logs` table.
//!
//! Insert and list only: audit rows are immutable and never deleted by
//! retention (only by plot cascade).

use plotweave_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::rollback_log::RollbackLog;

/// Column list for rollback_logs queries.
const COLUMNS: &str =
    "id, plot_id, snapshot_id, snapshot_version, user_id, reason, created_at";

/// Provides append and query operations for the rollback audit trail.
pub struct RollbackLogRepo;

impl RollbackLogRepo {
    /// Append one audit entry, inside the rollback transaction.
    pub async fn insert(
        conn: &mut PgConnection,
        plot_id: DbId,
        snapshot_id: DbId,
        snapshot_version: i32,
        user_id: DbId,
        reason: Option<&str>,
    ) -> Result<RollbackLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO rollback_logs
                (plot_id, snapshot_id, snapshot_version, user_id, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RollbackLog>(&query)
            .bind(plot_id)
            .bind(snapshot_id)
            .bind(snapshot_version)
            .bind(user_id)
            .bind(reason)
            .fetch_one(conn)
            .await
    }

    /// List a plot's rollback log, newest first.
    pub async fn list_by_plot(
        pool: &PgPool,
        plot_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RollbackLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rollback_logs
             WHERE plot_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, RollbackLog>(&query)
            .bind(plot_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a plot's rollback log entries (pagination metadata).
    pub async fn count_by_plot(pool: &PgPool, plot_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rollback_logs WHERE plot_id = $1")
            .bind(plot_id)
            .fetch_one(pool)
            .await
    }
}
