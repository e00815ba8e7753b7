//! Symbol calendar staging.
//!
//! # Responsibility
//! - Project day-keyed symbol entries and the fixed symbol picker.
//! - Stage per-day symbol set edits with the dirty flag set.
//!
//! # Invariants
//! - Entries are keyed by `YYYY-MM-DD` day ids; one entry per day.
//! - A day holds at most eight symbols.

use crate::model::record::{Record, RecordId};
use crate::modules::{decode_record, encode_record};
use serde::{Deserialize, Serialize};

/// Largest symbol set one day can hold.
pub const MAX_SYMBOLS_PER_DAY: usize = 8;

/// Picker symbols in display order.
pub const SYMBOLS: [&str; 8] = ["👀", "😈", "💣", "🩸", "🧴", "🤧", "🍊", "🚰"];

/// Render color for one symbol, when it has one.
pub fn symbol_color(symbol: &str) -> Option<&'static str> {
    match symbol {
        "👀" | "💣" => Some("black"),
        "😈" => Some("purple"),
        "🩸" | "♥" => Some("red"),
        "🧴" => Some("yellow"),
        "🤧" | "🚰" => Some("blue"),
        "🍊" => Some("orange"),
        _ => None,
    }
}

/// One calendar day entry; `text` carries the symbol list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub id: RecordId,
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

/// Symbols stored for one day, empty when the day has no entry.
pub fn day_symbols(records: &[Record], day_key: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(decode_record::<CalendarDay>)
        .find(|day| day.id == RecordId::from_day_key(day_key))
        .map(|day| day.text)
        .unwrap_or_default()
}

/// Toggles one symbol in a picker selection. Adding past the per-day cap is
/// rejected and returns false.
pub fn toggle_symbol(selection: &mut Vec<String>, symbol: &str) -> bool {
    if let Some(position) = selection.iter().position(|existing| existing == symbol) {
        selection.remove(position);
        return true;
    }
    if selection.len() >= MAX_SYMBOLS_PER_DAY {
        return false;
    }
    selection.push(symbol.to_string());
    true
}

/// Replaces one day's entry with the given symbol selection, marked dirty.
pub fn save_day(records: &mut Vec<Record>, day_key: &str, symbols: &[String]) {
    let id = RecordId::from_day_key(day_key);
    records.retain(|record| record.id != id);

    let day = CalendarDay {
        id,
        text: symbols.to_vec(),
        edit: Some(true),
    };
    if let Some(record) = encode_record(&day) {
        records.push(record);
    }
}
