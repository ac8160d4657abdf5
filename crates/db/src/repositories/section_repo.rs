//! Repository for the `sections` table.
//!
//! Section rows are owned by the editing surface; the history system only
//! bumps the edit counter when recording an operation and replaces the
//! whole set during rollback.

use plotweave_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::section::{NewSection, Section};

/// Column list for sections queries.
const COLUMNS: &str =
    "id, plot_id, title, content, order_index, version, created_at, updated_at";

/// Provides read, version-bump, and replace operations for sections.
pub struct SectionRepo;

impl SectionRepo {
    /// Find a section by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections WHERE id = $1");
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a plot's sections in document order.
    pub async fn list_by_plot(pool: &PgPool, plot_id: DbId) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections
             WHERE plot_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(plot_id)
            .fetch_all(pool)
            .await
    }

    /// Atomically increment a section's edit counter, returning the new
    /// version.
    ///
    /// The single UPDATE is the serialization point for concurrent edits
    /// to the same section: no read-then-write window, so versions are
    /// strictly increasing with no repeats. Returns `None` if the section
    /// does not exist.
    pub async fn bump_version(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE sections SET version = version + 1, updated_at = now()
             WHERE id = $1
             RETURNING version",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Delete all of a plot's sections and recreate them from snapshot
    /// entries, inside the caller's transaction.
    ///
    /// The recreated rows get database-generated ids: restored sections
    /// are new artifacts even when their content matches a prior one.
    pub async fn replace_all(
        conn: &mut PgConnection,
        plot_id: DbId,
        entries: &[NewSection],
    ) -> Result<Vec<Section>, sqlx::Error> {
        sqlx::query("DELETE FROM sections WHERE plot_id = $1")
            .bind(plot_id)
            .execute(&mut *conn)
            .await?;

        let query = format!(
            "INSERT INTO sections (plot_id, title, content, order_index, version)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            let section = sqlx::query_as::<_, Section>(&query)
                .bind(plot_id)
                .bind(&entry.title)
                .bind(&entry.content)
                .bind(entry.order_index)
                .bind(entry.version)
                .fetch_one(&mut *conn)
                .await?;
            created.push(section);
        }

        Ok(created)
    }
}
