//! Section diff between two historical plot versions.
//!
//! The cold tier stores whole-plot snapshots, so diffing one section
//! means locating the two snapshots that carry the requested plot
//! versions and extracting that section's text from each payload.

use plotweave_core::diff::{diff_lines, DiffEntry};
use plotweave_core::document::extract_text;
use plotweave_core::snapshot::SnapshotContent;
use plotweave_core::types::DbId;
use plotweave_db::models::ColdSnapshot;
use plotweave_db::repositories::{SectionRepo, SnapshotRepo};
use plotweave_db::DbPool;
use serde::Serialize;

use crate::error::{HistoryError, HistoryResult};

/// A computed diff between two historical versions of one section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionDiff {
    pub from_version: i32,
    pub to_version: i32,
    pub additions: Vec<DiffEntry>,
    pub deletions: Vec<DiffEntry>,
}

/// Diff one section's content between two plot versions.
///
/// Fails with NotFound when the section is absent or either version has
/// no snapshot. A section id missing from one payload (it predates the
/// section, or a rollback replaced the section set) reads as empty text
/// on that side rather than an error.
pub async fn get_diff(
    pool: &DbPool,
    section_id: DbId,
    from_version: i32,
    to_version: i32,
) -> HistoryResult<SectionDiff> {
    let section = SectionRepo::find_by_id(pool, section_id)
        .await?
        .ok_or_else(|| HistoryError::not_found("section", section_id))?;

    let from_snapshot = SnapshotRepo::find_by_plot_and_version(pool, section.plot_id, from_version)
        .await?
        .ok_or_else(|| HistoryError::not_found("snapshot for version", from_version))?;
    let to_snapshot = SnapshotRepo::find_by_plot_and_version(pool, section.plot_id, to_version)
        .await?
        .ok_or_else(|| HistoryError::not_found("snapshot for version", to_version))?;

    let from_text = section_text(&from_snapshot, section_id)?;
    let to_text = section_text(&to_snapshot, section_id)?;

    let (additions, deletions) = diff_lines(&from_text, &to_text);

    Ok(SectionDiff {
        from_version,
        to_version,
        additions,
        deletions,
    })
}

/// Extract one section's flattened text from a snapshot payload.
fn section_text(snapshot: &ColdSnapshot, section_id: DbId) -> HistoryResult<String> {
    let content: SnapshotContent = serde_json::from_value(snapshot.content.clone())
        .map_err(|e| {
            plotweave_core::error::CoreError::Internal(format!(
                "Snapshot {} payload unreadable: {e}",
                snapshot.id
            ))
        })?;

    let text = content
        .sections
        .iter()
        .find(|entry| entry.id == Some(section_id))
        .map(|entry| extract_text(entry.content.as_ref()))
        .unwrap_or_default();

    Ok(text)
}
