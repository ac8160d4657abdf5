//! Repository for the `users` table.
//!
//! Read-only from the history system's point of view: user rows are owned
//! by the account service and only resolved here for display.

use plotweave_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, display_name, avatar_url, created_at";

/// Provides lookup operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a set of users in one query (avoids one lookup per history
    /// row).
    pub async fn resolve_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<User>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
