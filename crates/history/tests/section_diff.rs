//! Integration tests for section diffs across historical plot versions.

mod common;

use assert_matches::assert_matches;
use plotweave_core::error::CoreError;
use plotweave_core::types::DbId;
use plotweave_db::repositories::SnapshotRepo;
use plotweave_history::diff::get_diff;
use plotweave_history::error::HistoryError;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{doc, seed_plot, seed_section, seed_user};

/// Insert a snapshot carrying `version` whose payload holds one section.
async fn snapshot_with_section(
    pool: &PgPool,
    plot_id: DbId,
    section_id: DbId,
    version: i32,
    text: &str,
) {
    let content = json!({
        "plot": {"title": "My Plot"},
        "sections": [
            {"id": section_id, "title": "Chapter 1", "content": doc(text),
             "orderIndex": 0, "version": 1},
        ],
    });
    SnapshotRepo::insert(pool, plot_id, &content, version)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn changed_line_yields_one_deletion_and_one_addition(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", Some(doc("line1\nline3")), 0).await;

    snapshot_with_section(&pool, plot_id, section_id, 1, "line1\nline2").await;
    snapshot_with_section(&pool, plot_id, section_id, 2, "line1\nline3").await;

    let diff = get_diff(&pool, section_id, 1, 2).await.unwrap();

    assert_eq!(diff.from_version, 1);
    assert_eq!(diff.to_version, 2);
    assert_eq!(diff.deletions.len(), 1);
    assert_eq!(diff.deletions[0].text, "line2");
    assert_eq!(diff.additions.len(), 1);
    assert_eq!(diff.additions[0].text, "line3");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn identical_versions_diff_to_nothing(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", Some(doc("same")), 0).await;

    snapshot_with_section(&pool, plot_id, section_id, 1, "same").await;
    snapshot_with_section(&pool, plot_id, section_id, 2, "same").await;

    let diff = get_diff(&pool, section_id, 1, 2).await.unwrap();
    assert!(diff.additions.is_empty());
    assert!(diff.deletions.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_snapshot_version_is_not_found(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", Some(doc("hi")), 0).await;

    snapshot_with_section(&pool, plot_id, section_id, 1, "hi").await;

    let err = get_diff(&pool, section_id, 1, 9).await.unwrap_err();
    assert_matches!(err, HistoryError::Core(CoreError::NotFound { .. }));

    let err = get_diff(&pool, Uuid::new_v4(), 1, 1).await.unwrap_err();
    assert_matches!(err, HistoryError::Core(CoreError::NotFound { entity: "section", .. }));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn section_absent_from_older_payload_reads_as_empty(pool: PgPool) {
    let user_id = seed_user(&pool, "alice").await;
    let plot_id = seed_plot(&pool, user_id, "My Plot").await;
    let section_id = seed_section(&pool, plot_id, "Chapter 1", Some(doc("fresh")), 0).await;

    // Version 1 predates the section entirely.
    let empty = json!({"plot": {"title": "My Plot"}, "sections": []});
    SnapshotRepo::insert(&pool, plot_id, &empty, 1).await.unwrap();
    snapshot_with_section(&pool, plot_id, section_id, 2, "fresh").await;

    let diff = get_diff(&pool, section_id, 1, 2).await.unwrap();
    assert!(diff.deletions.is_empty());
    assert_eq!(diff.additions.len(), 1);
    assert_eq!(diff.additions[0].text, "fresh");
}
