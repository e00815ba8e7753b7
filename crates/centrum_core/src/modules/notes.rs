//! Free-text notes staging.
//!
//! # Responsibility
//! - Project the note pads and stage text edits with the dirty flag set.
//!
//! # Invariants
//! - A freshly added note is empty and clean; it only becomes dirty once
//!   text is typed into it, so untouched pads never push.

use crate::model::record::{Record, RecordId};
use crate::modules::decode_record;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One note pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

/// All note pads in creation order.
pub fn all_notes(records: &[Record]) -> Vec<Note> {
    let mut notes: Vec<Note> = records
        .iter()
        .filter_map(decode_record::<Note>)
        .collect();
    notes.sort_by(|a, b| a.id.cmp(&b.id));
    notes
}

/// Appends an empty note pad, created clean.
pub fn add_note(records: &mut Vec<Record>, now_epoch_ms: i64) {
    let mut record = Record::new(RecordId::from_epoch_ms(now_epoch_ms));
    record.edit = Some(false);
    record.set_field("text", json!(""));
    records.push(record);
}

/// Replaces one note's text and marks it dirty.
pub fn set_text(records: &mut [Record], id: &RecordId, text: &str) {
    for record in records.iter_mut() {
        if &record.id == id {
            record.set_field("text", json!(text));
            record.mark_dirty();
        }
    }
}
