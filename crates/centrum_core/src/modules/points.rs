//! Point-scoring ledger staging.
//!
//! # Responsibility
//! - Project per-owner ledger entries and their running total.
//! - Stage new entries and vetoes with the dirty flag set.
//!
//! # Invariants
//! - Reason text is capped at 60 characters.
//! - A veto blanks the entry text; the point change stays in history but
//!   vetoed entries no longer count or display.

use crate::model::record::{Record, RecordId};
use crate::modules::{decode_record, encode_record};
use serde::{Deserialize, Serialize};

/// Longest accepted reason text.
pub const MAX_REASON_CHARS: usize = 60;

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsEntry {
    pub id: RecordId,
    /// Signed point delta.
    pub change: i64,
    pub text: String,
    /// Owner name the ledger column belongs to.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

/// Non-vetoed entries for one owner, newest first by id.
pub fn visible_entries(records: &[Record], owner: &str) -> Vec<PointsEntry> {
    let mut entries: Vec<PointsEntry> = records
        .iter()
        .filter_map(decode_record::<PointsEntry>)
        .filter(|entry| entry.name == owner && !entry.text.is_empty())
        .collect();
    entries.sort_by(|a, b| b.id.cmp(&a.id));
    entries
}

/// Running total for one owner across non-vetoed entries.
pub fn total(records: &[Record], owner: &str) -> i64 {
    visible_entries(records, owner)
        .iter()
        .map(|entry| entry.change)
        .sum()
}

/// Appends a ledger entry. Returns false (snapshot untouched) when the
/// trimmed reason is empty; longer reasons are truncated to the cap.
pub fn add_entry(
    records: &mut Vec<Record>,
    owner: &str,
    change: i64,
    text: &str,
    now_epoch_ms: i64,
) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    let entry = PointsEntry {
        id: RecordId::from_epoch_ms(now_epoch_ms),
        change,
        text: trimmed.chars().take(MAX_REASON_CHARS).collect(),
        name: owner.to_string(),
        edit: Some(true),
    };
    if let Some(record) = encode_record(&entry) {
        records.push(record);
        return true;
    }
    false
}

/// Vetoes one entry by blanking its reason text.
pub fn veto(records: &mut [Record], id: &RecordId) {
    for record in records.iter_mut() {
        if &record.id == id {
            record.set_field("text", serde_json::json!(""));
            record.mark_dirty();
        }
    }
}
