//! Task list staging (To-Do and household modules).
//!
//! # Responsibility
//! - Project owner-named task lists out of one shared module snapshot.
//! - Stage add/toggle/clear edits with the dirty flag set.
//!
//! # Invariants
//! - Lists are partitioned by the `name` field; edits never touch another
//!   owner's records.
//! - Completed-task cleanup blanks the text (tombstone) instead of deleting.

use crate::model::record::{Record, RecordId};
use crate::modules::{decode_record, encode_record};
use serde::{Deserialize, Serialize};

/// One task row as the To-Do screens persist it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Owner list name (for example a family member or "Lednička ❄️").
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

/// Tasks for one owner in display order: blank tombstones hidden,
/// incomplete tasks first, otherwise stable.
pub fn visible_tasks(records: &[Record], owner: &str) -> Vec<Task> {
    let mut tasks: Vec<Task> = records
        .iter()
        .filter_map(decode_record::<Task>)
        .filter(|task| task.name == owner && !task.text.trim().is_empty())
        .collect();
    tasks.sort_by_key(|task| task.completed);
    tasks
}

/// Adds a task for `owner`. Returns false (snapshot untouched) when the
/// trimmed text is empty.
pub fn add_task(records: &mut Vec<Record>, owner: &str, text: &str, now_epoch_ms: i64) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    let task = Task {
        id: RecordId::from_epoch_ms(now_epoch_ms),
        text: trimmed.to_string(),
        completed: false,
        name: owner.to_string(),
        edit: Some(true),
    };
    if let Some(record) = encode_record(&task) {
        records.push(record);
        return true;
    }
    false
}

/// Flips one task's completion state and marks it dirty.
pub fn toggle_task(records: &mut [Record], id: &RecordId) {
    for record in records.iter_mut() {
        if &record.id == id {
            let completed = record.bool_field("completed").unwrap_or(false);
            record.set_field("completed", serde_json::json!(!completed));
            record.mark_dirty();
        }
    }
}

/// Tombstones every completed task of `owner` by blanking its text.
pub fn clear_completed(records: &mut [Record], owner: &str) {
    for record in records.iter_mut() {
        let is_owned = record.str_field("name") == Some(owner);
        let is_completed = record.bool_field("completed").unwrap_or(false);
        if is_owned && is_completed {
            record.set_field("text", serde_json::json!(""));
            record.mark_dirty();
        }
    }
}
