//! Integration tests for the hot operation log: version sequencing, the
//! 72-hour visibility window, and TTL purge.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use plotweave_core::error::CoreError;
use plotweave_history::error::HistoryError;
use plotweave_history::operations::{get_history, purge_expired, record_operation};
use sqlx::PgPool;
use uuid::Uuid;

use common::{doc, seed_plot, seed_section, seed_user, set_operation_created_at};

#[sqlx::test(migrations = "../db/migrations")]
async fn versions_increase_strictly_with_no_gaps(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", Some(doc("hi")), 0).await;

    // Sections start at version 1; edits produce 2, 3, 4, ...
    for expected in 2..=6 {
        let op = record_operation(&pool, section_id, user_id, "update", None)
            .await
            .unwrap();
        assert_eq!(op.version, expected);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_edits_never_reuse_a_version(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", Some(doc("hi")), 0).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            record_operation(&pool, section_id, user_id, "insert", None)
                .await
                .unwrap()
                .version
        }));
    }

    let mut versions = Vec::new();
    for handle in handles {
        versions.push(handle.await.unwrap());
    }
    versions.sort_unstable();

    assert_eq!(versions, (2..=9).collect::<Vec<i32>>());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn record_fails_for_missing_section_or_user(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", None, 0).await;

    let err = record_operation(&pool, Uuid::new_v4(), user_id, "insert", None)
        .await
        .unwrap_err();
    assert_matches!(err, HistoryError::Core(CoreError::NotFound { entity: "section", .. }));

    let err = record_operation(&pool, section_id, Uuid::new_v4(), "insert", None)
        .await
        .unwrap_err();
    assert_matches!(err, HistoryError::Core(CoreError::NotFound { entity: "user", .. }));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn history_is_newest_first_with_resolved_users(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", Some(doc("hi")), 0).await;

    record_operation(&pool, section_id, user_id, "insert", Some(serde_json::json!({"i": 1})))
        .await
        .unwrap();
    record_operation(&pool, section_id, user_id, "update", Some(serde_json::json!({"i": 2})))
        .await
        .unwrap();

    let (items, total) = get_history(&pool, section_id, None, None).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);
    // Newest first.
    assert_eq!(items[0].op_type, "update");
    assert_eq!(items[1].op_type, "insert");
    assert_eq!(items[0].user.as_ref().unwrap().display_name, "alice");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn history_respects_limit_and_offset(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", None, 0).await;

    for _ in 0..5 {
        record_operation(&pool, section_id, user_id, "update", None)
            .await
            .unwrap();
    }

    let (items, total) = get_history(&pool, section_id, Some(2), None).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(items.len(), 2);

    let (items, total) = get_history(&pool, section_id, Some(10), Some(3)).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(items.len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn window_boundary_includes_71h59m_excludes_72h01m(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", None, 0).await;

    let inside = record_operation(&pool, section_id, user_id, "update", None)
        .await
        .unwrap();
    let outside = record_operation(&pool, section_id, user_id, "update", None)
        .await
        .unwrap();

    set_operation_created_at(
        &pool,
        inside.id,
        Utc::now() - chrono::Duration::minutes(71 * 60 + 59),
    )
    .await;
    set_operation_created_at(
        &pool,
        outside.id,
        Utc::now() - chrono::Duration::minutes(72 * 60 + 1),
    )
    .await;

    let (items, total) = get_history(&pool, section_id, None, None).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, inside.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn purge_is_idempotent(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", None, 0).await;

    let expired = record_operation(&pool, section_id, user_id, "update", None)
        .await
        .unwrap();
    let fresh = record_operation(&pool, section_id, user_id, "update", None)
        .await
        .unwrap();
    set_operation_created_at(&pool, expired.id, Utc::now() - chrono::Duration::hours(73)).await;

    assert_eq!(purge_expired(&pool).await.unwrap(), 1);
    assert_eq!(purge_expired(&pool).await.unwrap(), 0);

    let (items, total) = get_history(&pool, section_id, None, None).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, fresh.id);
}
