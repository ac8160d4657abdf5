//! Snapshot content model: the self-describing payload persisted for every
//! plot-wide snapshot.
//!
//! The payload must stay readable across schema evolution in both
//! directions: a snapshot captured before a metadata field existed must
//! still roll back cleanly, and rollback must distinguish "field absent
//! from the payload, leave it unchanged" from "field explicitly null,
//! clear it". [`Patch`] carries that three-state semantics.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum serialized snapshot size in bytes (10 MB).
///
/// Captures above this size are skipped, never truncated.
pub const MAX_SNAPSHOT_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Whether a serialized snapshot of `size_bytes` may be persisted.
pub fn within_size_cap(size_bytes: usize) -> bool {
    size_bytes <= MAX_SNAPSHOT_SIZE_BYTES
}

// ---------------------------------------------------------------------------
// Three-state optional
// ---------------------------------------------------------------------------

/// A field that is absent, explicitly null, or set to a value.
///
/// Plain `Option` collapses "missing key" and "null" into one state; the
/// rollback engine needs them apart (absent fields are left untouched,
/// null fields are cleared). `Absent` is the serde default for missing
/// keys and is skipped on serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// The value to write, if this patch touches the field at all.
    /// `Absent` yields `None`; `Null` yields `Some(None)`.
    pub fn to_update(&self) -> Option<Option<&T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Absent fields are skipped via `skip_serializing_if`; if one
            // slips through it degrades to null.
            Patch::Absent | Patch::Null => serializer.serialize_none(),
            Patch::Value(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

// ---------------------------------------------------------------------------
// Payload structure
// ---------------------------------------------------------------------------

/// Plot metadata as recorded in a snapshot payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlotMeta {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    /// Tags are carried as raw JSON: the column is an opaque JSONB list
    /// owned by the CRUD surface.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub tags: Patch<serde_json::Value>,
}

/// One section as recorded in a snapshot payload.
///
/// Every field except `title` is tolerant of older payloads that predate
/// it: `id` and `version` were not always recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSnapshot {
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(rename = "orderIndex", default)]
    pub order_index: i32,
    #[serde(default = "initial_section_version")]
    pub version: i32,
}

fn initial_section_version() -> i32 {
    1
}

/// The full self-describing snapshot payload: plot metadata plus the
/// ordered section list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotContent {
    #[serde(default)]
    pub plot: PlotMeta,
    #[serde(default)]
    pub sections: Vec<SectionSnapshot>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
