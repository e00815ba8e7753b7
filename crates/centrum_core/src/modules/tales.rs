//! Bedtime-tale library staging.
//!
//! # Responsibility
//! - Project the stored tales and stage new ones with the dirty flag set.
//!
//! # Invariants
//! - Author name, title and body are all required; a tale with any of them
//!   blank never enters the snapshot.
//! - Tale ids are stringified creation timestamps, unlike the integer ids
//!   the other list modules use.

use crate::model::record::{Record, RecordId};
use crate::modules::{decode_record, encode_record};
use serde::{Deserialize, Serialize};

/// One stored tale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tale {
    pub id: RecordId,
    /// Author name shown on the card.
    pub name: String,
    pub title: String,
    /// Full tale body.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

/// All stored tales, oldest first by id.
pub fn all_tales(records: &[Record]) -> Vec<Tale> {
    let mut tales: Vec<Tale> = records
        .iter()
        .filter_map(decode_record::<Tale>)
        .filter(|tale| !tale.text.is_empty())
        .collect();
    tales.sort_by(|a, b| a.id.cmp(&b.id));
    tales
}

/// One tale by id, for the reader view.
pub fn tale(records: &[Record], id: &RecordId) -> Option<Tale> {
    records
        .iter()
        .filter_map(decode_record::<Tale>)
        .find(|tale| &tale.id == id)
}

/// Adds a tale. Returns false (snapshot untouched) when any field is blank
/// after trimming.
pub fn add_tale(
    records: &mut Vec<Record>,
    author: &str,
    title: &str,
    text: &str,
    now_epoch_ms: i64,
) -> bool {
    let author = author.trim();
    let title = title.trim();
    let text = text.trim();
    if author.is_empty() || title.is_empty() || text.is_empty() {
        return false;
    }

    let tale = Tale {
        id: RecordId::Text(now_epoch_ms.to_string()),
        name: author.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        edit: Some(true),
    };
    if let Some(record) = encode_record(&tale) {
        records.push(record);
        return true;
    }
    false
}
