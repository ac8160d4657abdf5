//! Shared seeding helpers for history integration tests.
//!
//! The CRUD surface that normally creates users, plots, and sections is a
//! separate service, so tests insert rows directly.
#![allow(dead_code)]

use plotweave_core::types::{DbId, Timestamp};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn seed_user(pool: &PgPool, display_name: &str) -> DbId {
    sqlx::query_scalar::<_, DbId>(
        "INSERT INTO users (email, display_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(display_name)
    .fetch_one(pool)
    .await
    .expect("seed user")
}

pub async fn seed_plot(pool: &PgPool, owner_id: DbId, title: &str) -> DbId {
    sqlx::query_scalar::<_, DbId>(
        "INSERT INTO plots (title, description, owner_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(title)
    .bind("a test plot")
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .expect("seed plot")
}

pub async fn seed_section(
    pool: &PgPool,
    plot_id: DbId,
    title: &str,
    content: Option<serde_json::Value>,
    order_index: i32,
) -> DbId {
    sqlx::query_scalar::<_, DbId>(
        "INSERT INTO sections (plot_id, title, content, order_index)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(plot_id)
    .bind(title)
    .bind(content)
    .bind(order_index)
    .fetch_one(pool)
    .await
    .expect("seed section")
}

/// A minimal rich-document tree with one text leaf.
pub fn doc(text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "doc",
        "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": text}]},
        ],
    })
}

/// Rewrite an operation's created_at (TTL boundary tests).
pub async fn set_operation_created_at(pool: &PgPool, operation_id: DbId, at: Timestamp) {
    sqlx::query("UPDATE hot_operations SET created_at = $2 WHERE id = $1")
        .bind(operation_id)
        .bind(at)
        .execute(pool)
        .await
        .expect("backdate operation");
}

/// Rewrite a snapshot's created_at (retention aging tests).
pub async fn set_snapshot_created_at(pool: &PgPool, snapshot_id: DbId, at: Timestamp) {
    sqlx::query("UPDATE cold_snapshots SET created_at = $2 WHERE id = $1")
        .bind(snapshot_id)
        .bind(at)
        .execute(pool)
        .await
        .expect("backdate snapshot");
}

pub async fn snapshot_count(pool: &PgPool, plot_id: DbId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM cold_snapshots WHERE plot_id = $1")
        .bind(plot_id)
        .fetch_one(pool)
        .await
        .expect("count snapshots")
}
