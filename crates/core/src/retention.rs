//! Snapshot retention planning: which snapshots to delete as they age.
//!
//! Policy, applied independently per plot:
//! - younger than 7 days: untouched (full fidelity)
//! - 7 to 30 days: at most one snapshot per hour, keeping the newest
//! - 30 days and older: at most one snapshot per day, keeping the newest
//!
//! This module is pure planning over `(id, created_at)` pairs; all data
//! access happens in the repository layer.

use std::collections::HashSet;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Policy constants
// ---------------------------------------------------------------------------

/// Snapshots younger than this many days are never thinned.
pub const FULL_FIDELITY_DAYS: i64 = 7;

/// Snapshots between [`FULL_FIDELITY_DAYS`] and this age keep one per hour;
/// older ones keep one per day.
pub const HOURLY_FIDELITY_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Bucketing
// ---------------------------------------------------------------------------

/// Time-bucket width used when thinning an age range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketGranularity {
    Hour,
    Day,
}

impl BucketGranularity {
    /// The bucket key a timestamp falls into (floor to the hour or day).
    pub fn key(&self, at: Timestamp) -> String {
        match self {
            Self::Hour => at.format("%Y-%m-%d-%H").to_string(),
            Self::Day => at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// The `(id, created_at)` pair the planner works over.
#[derive(Debug, Clone)]
pub struct SnapshotStamp {
    pub id: DbId,
    pub created_at: Timestamp,
}

/// Plan which snapshots to delete from one age range of one plot.
///
/// `snapshots` must be ordered newest first: the walk keeps the first
/// snapshot it sees per bucket (the newest, given the ordering) and marks
/// every later one in an already-seen bucket for deletion. An empty input
/// produces an empty plan.
pub fn plan_thinning(snapshots: &[SnapshotStamp], granularity: BucketGranularity) -> Vec<DbId> {
    let mut seen_buckets: HashSet<String> = HashSet::new();
    let mut delete_ids = Vec::new();

    for snapshot in snapshots {
        let bucket = granularity.key(snapshot.created_at);
        if !seen_buckets.insert(bucket) {
            delete_ids.push(snapshot.id);
        }
    }

    delete_ids
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn stamp(ts: Timestamp) -> SnapshotStamp {
        SnapshotStamp { id: Uuid::new_v4(), created_at: ts }
    }

    #[test]
    fn empty_range_plans_zero_deletions() {
        assert!(plan_thinning(&[], BucketGranularity::Hour).is_empty());
    }

    #[test]
    fn keeps_only_the_newest_of_five_in_one_hour() {
        let base = Utc.with_ymd_and_hms(2026, 7, 1, 14, 0, 0).unwrap();
        // Newest first, all within hour 14.
        let snapshots: Vec<SnapshotStamp> = (0..5)
            .map(|i| stamp(base + chrono::Duration::minutes(50 - i * 10)))
            .collect();
        let newest = snapshots[0].id;

        let deleted = plan_thinning(&snapshots, BucketGranularity::Hour);
        assert_eq!(deleted.len(), 4);
        assert!(!deleted.contains(&newest));
    }

    #[test]
    fn distinct_hours_are_independent_buckets() {
        let base = Utc.with_ymd_and_hms(2026, 7, 1, 0, 30, 0).unwrap();
        let snapshots: Vec<SnapshotStamp> = (0..4)
            .map(|i| stamp(base + chrono::Duration::hours(3 - i)))
            .collect();
        assert!(plan_thinning(&snapshots, BucketGranularity::Hour).is_empty());
    }

    #[test]
    fn day_granularity_collapses_hours() {
        let base = Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap();
        let snapshots = vec![
            stamp(base + chrono::Duration::hours(23)),
            stamp(base + chrono::Duration::hours(12)),
            stamp(base + chrono::Duration::hours(1)),
            stamp(base - chrono::Duration::hours(1)), // previous day
        ];
        let deleted = plan_thinning(&snapshots, BucketGranularity::Day);
        assert_eq!(deleted.len(), 2);
        assert_eq!(deleted[0], snapshots[1].id);
        assert_eq!(deleted[1], snapshots[2].id);
    }

    #[test]
    fn hour_bucket_respects_calendar_boundaries() {
        // 13:59 and 14:01 are adjacent in time but different buckets.
        let earlier = Utc.with_ymd_and_hms(2026, 7, 1, 13, 59, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 7, 1, 14, 1, 0).unwrap();
        let snapshots = vec![stamp(later), stamp(earlier)];
        assert!(plan_thinning(&snapshots, BucketGranularity::Hour).is_empty());
    }
}
