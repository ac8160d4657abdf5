//! Repository for the `hot_operations` table.
//!
//! Rows are immutable once written and leave the table only through the
//! TTL purge.

use plotweave_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::operation::HotOperation;

/// Column list for hot_operations queries.
const COLUMNS: &str = "id, section_id, op_type, payload, user_id, version, created_at";

/// Provides append, windowed-read, and purge operations for the hot log.
pub struct OperationRepo;

impl OperationRepo {
    /// Append one operation, inside the caller's transaction (the same
    /// transaction that bumped the section version).
    pub async fn insert(
        conn: &mut PgConnection,
        section_id: DbId,
        user_id: DbId,
        op_type: &str,
        payload: Option<&serde_json::Value>,
        version: i32,
    ) -> Result<HotOperation, sqlx::Error> {
        let query = format!(
            "INSERT INTO hot_operations (section_id, op_type, payload, user_id, version)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HotOperation>(&query)
            .bind(section_id)
            .bind(op_type)
            .bind(payload)
            .bind(user_id)
            .bind(version)
            .fetch_one(conn)
            .await
    }

    /// List a section's operations newer than `cutoff`, newest first.
    ///
    /// Rows older than the cutoff stay invisible even when the purge has
    /// not physically removed them yet.
    pub async fn list_recent(
        pool: &PgPool,
        section_id: DbId,
        cutoff: Timestamp,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HotOperation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hot_operations
             WHERE section_id = $1 AND created_at >= $2
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, HotOperation>(&query)
            .bind(section_id)
            .bind(cutoff)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a section's operations newer than `cutoff` (pagination
    /// metadata).
    pub async fn count_recent(
        pool: &PgPool,
        section_id: DbId,
        cutoff: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM hot_operations
             WHERE section_id = $1 AND created_at >= $2",
        )
        .bind(section_id)
        .bind(cutoff)
        .fetch_one(pool)
        .await
    }

    /// Delete all operations created before `cutoff`, returning the count.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hot_operations WHERE created_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
