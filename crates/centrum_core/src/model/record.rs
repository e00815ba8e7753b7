//! Canonical record model and snapshot comparison helpers.
//!
//! # Responsibility
//! - Define the one record shape every module persists and syncs.
//! - Provide id-ordered snapshot equality used by the sync coordinator.
//!
//! # Invariants
//! - `id` is unique within a module and never reused.
//! - A missing `edit` flag means the record still needs a push.
//! - Snapshot comparisons always sort by `id` ascending first.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Record identifier within one module.
///
/// Most modules use creation epoch-milliseconds, which keeps integer ids
/// monotonically increasing. Day-keyed modules (calendar, expenses) use
/// `YYYY-MM-DD` strings instead, so both shapes must round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    pub fn from_epoch_ms(epoch_ms: i64) -> Self {
        Self::Int(epoch_ms)
    }

    pub fn from_day_key(day_key: impl Into<String>) -> Self {
        Self::Text(day_key.into())
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            // Integer ids sort before day-key ids so mixed snapshots still
            // have one deterministic order on both devices.
            (Self::Int(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

/// One persisted item within a module.
///
/// Payload fields differ per module (task text, symbol lists, expense
/// amounts, ...) and are carried structurally in `fields` without schema
/// validation. Only `id` and the dirty flag have cross-module meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Dirty flag. `Some(true)` and `None` both mean "needs push"; the
    /// absent-means-dirty default covers legacy records that predate the flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
    /// Module-specific payload, kept opaque to the sync core.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Creates a record with an empty payload, marked dirty.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            edit: Some(true),
            fields: Map::new(),
        }
    }

    /// Returns whether this record must be included in the next push.
    pub fn is_dirty(&self) -> bool {
        self.edit.unwrap_or(true)
    }

    /// Marks the record as locally modified.
    pub fn mark_dirty(&mut self) {
        self.edit = Some(true);
    }

    /// Returns a copy with the dirty flag cleared to its canonical
    /// "clean" representation (flag absent).
    pub fn normalized(&self) -> Self {
        let mut clean = self.clone();
        clean.edit = None;
        clean
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn i64_field(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    pub fn set_field(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }
}

/// Sorts a snapshot by id ascending, in place.
///
/// Server and local sides serialize JSON in different orders, so every
/// comparison must normalize ordering first.
pub fn sort_by_id(records: &mut [Record]) {
    records.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Full structural equality of two snapshots after id-ascending sort.
pub fn snapshots_equal(local: &[Record], remote: &[Record]) -> bool {
    sorted(local) == sorted(remote)
}

/// Equality of two snapshots ignoring dirty flags on both sides.
///
/// Used to tell genuinely new remote content apart from the device's own
/// just-acknowledged edits: a local record pushed as `edit=true` comes back
/// from the server without the flag, and must not raise a new-data alert.
pub fn snapshots_equal_normalized(local: &[Record], remote: &[Record]) -> bool {
    let mut local: Vec<Record> = local.iter().map(Record::normalized).collect();
    let mut remote: Vec<Record> = remote.iter().map(Record::normalized).collect();
    sort_by_id(&mut local);
    sort_by_id(&mut remote);
    local == remote
}

/// Returns the records that need pushing: dirty flag true or absent.
pub fn dirty_records(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .filter(|record| record.is_dirty())
        .cloned()
        .collect()
}

fn sorted(records: &[Record]) -> Vec<Record> {
    let mut copy = records.to_vec();
    sort_by_id(&mut copy);
    copy
}
