//! Hot operation log: record, windowed history reads, TTL purge.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use plotweave_core::error::CoreError;
use plotweave_core::pagination::{clamp_limit, clamp_offset, DEFAULT_HISTORY_LIMIT, MAX_LIST_LIMIT};
use plotweave_core::types::{DbId, Timestamp};
use plotweave_db::models::{HotOperation, UserRef};
use plotweave_db::repositories::{OperationRepo, SectionRepo, UserRepo};
use plotweave_db::DbPool;
use serde::Serialize;

use crate::error::{HistoryError, HistoryResult};

/// How long operations stay visible and stored in the hot tier.
pub const HOT_OPERATION_TTL_HOURS: i64 = 72;

/// Longest accepted operation tag.
const MAX_OP_TYPE_LEN: usize = 20;

/// One operation in a history listing, with its author resolved.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub id: DbId,
    pub section_id: DbId,
    pub op_type: String,
    pub payload: Option<serde_json::Value>,
    /// `None` when the author account no longer exists.
    pub user: Option<UserRef>,
    pub version: i32,
    pub created_at: Timestamp,
}

fn validate_op_type(op_type: &str) -> Result<(), CoreError> {
    if op_type.trim().is_empty() {
        return Err(CoreError::Validation("op_type must not be empty".into()));
    }
    if op_type.len() > MAX_OP_TYPE_LEN {
        return Err(CoreError::Validation(format!(
            "op_type must be at most {MAX_OP_TYPE_LEN} characters"
        )));
    }
    Ok(())
}

/// Record one edit against a section.
///
/// Increments the section's edit counter and appends the operation tagged
/// with the new version, in a single transaction. The counter bump is a
/// bare `UPDATE ... RETURNING`, so concurrent edits to the same section
/// serialize on the row and never produce duplicate versions; edits to
/// different sections do not contend.
///
/// Fails with NotFound when the section or the author does not exist.
pub async fn record_operation(
    pool: &DbPool,
    section_id: DbId,
    user_id: DbId,
    op_type: &str,
    payload: Option<serde_json::Value>,
) -> HistoryResult<HotOperation> {
    validate_op_type(op_type).map_err(HistoryError::Core)?;

    if UserRepo::find_by_id(pool, user_id).await?.is_none() {
        return Err(HistoryError::not_found("user", user_id));
    }

    let mut tx = pool.begin().await?;

    let version = SectionRepo::bump_version(&mut *tx, section_id)
        .await?
        .ok_or_else(|| HistoryError::not_found("section", section_id))?;

    let operation = OperationRepo::insert(
        &mut *tx,
        section_id,
        user_id,
        op_type,
        payload.as_ref(),
        version,
    )
    .await?;

    tx.commit().await?;

    tracing::debug!(
        section_id = %section_id,
        version,
        op_type,
        "Operation recorded"
    );

    Ok(operation)
}

/// List a section's operations within the 72-hour window, newest first.
///
/// Authors are resolved in one batch query. Fails with NotFound when the
/// section does not exist.
pub async fn get_history(
    pool: &DbPool,
    section_id: DbId,
    limit: Option<i64>,
    offset: Option<i64>,
) -> HistoryResult<(Vec<HistoryItem>, i64)> {
    if SectionRepo::find_by_id(pool, section_id).await?.is_none() {
        return Err(HistoryError::not_found("section", section_id));
    }

    let cutoff = Utc::now() - chrono::Duration::hours(HOT_OPERATION_TTL_HOURS);
    let limit = clamp_limit(limit, DEFAULT_HISTORY_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(offset);

    let total = OperationRepo::count_recent(pool, section_id, cutoff).await?;
    let operations = OperationRepo::list_recent(pool, section_id, cutoff, limit, offset).await?;

    let user_ids: Vec<DbId> = operations
        .iter()
        .map(|op| op.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let users: HashMap<DbId, UserRef> = UserRepo::resolve_many(pool, &user_ids)
        .await?
        .iter()
        .map(|user| (user.id, UserRef::from(user)))
        .collect();

    let items = operations
        .into_iter()
        .map(|op| HistoryItem {
            user: users.get(&op.user_id).cloned(),
            id: op.id,
            section_id: op.section_id,
            op_type: op.op_type,
            payload: op.payload,
            version: op.version,
            created_at: op.created_at,
        })
        .collect();

    Ok((items, total))
}

/// Delete operations older than the TTL window, returning the count.
///
/// Idempotent: a second call with nothing newly expired deletes zero.
pub async fn purge_expired(pool: &DbPool) -> HistoryResult<u64> {
    let cutoff = Utc::now() - chrono::Duration::hours(HOT_OPERATION_TTL_HOURS);
    let deleted = OperationRepo::delete_older_than(pool, cutoff).await?;
    Ok(deleted)
}
