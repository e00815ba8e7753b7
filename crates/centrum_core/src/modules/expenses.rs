//! Expense tracking staging.
//!
//! # Responsibility
//! - Project day-keyed expense entries and the category/issuer summary.
//! - Stage per-day expense edits with the dirty flag set.
//!
//! # Invariants
//! - Entries are keyed by `YYYY-MM-DD` day ids; one entry per day.
//! - `text`, `issuers` and `categories` are parallel arrays: index `i`
//!   describes one expense line.
//! - An amount of zero or the `X` issuer placeholder never enters a day.

use crate::model::record::{Record, RecordId};
use crate::modules::{decode_record, encode_record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Issuer dropdown placeholder that means "nobody picked".
pub const ISSUER_PLACEHOLDER: &str = "X";

/// One day of expenses, stored as parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDay {
    pub id: RecordId,
    /// Amounts, one per expense line.
    #[serde(default)]
    pub text: Vec<i64>,
    #[serde(default)]
    pub issuers: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
}

impl ExpenseDay {
    fn new(day_key: &str) -> Self {
        Self {
            id: RecordId::from_day_key(day_key),
            text: Vec::new(),
            issuers: Vec::new(),
            categories: Vec::new(),
            edit: None,
        }
    }

    /// Sum of the day's amounts.
    pub fn total(&self) -> i64 {
        self.text.iter().sum()
    }
}

/// The stored entry for one day, when it exists.
pub fn day_entry(records: &[Record], day_key: &str) -> Option<ExpenseDay> {
    records
        .iter()
        .filter_map(decode_record::<ExpenseDay>)
        .find(|day| day.id == RecordId::from_day_key(day_key))
}

/// Appends one expense line to a day, replacing the day's entry and marking
/// it dirty. Returns false (snapshot untouched) when the amount is zero or
/// no issuer was picked.
pub fn add_expense(
    records: &mut Vec<Record>,
    day_key: &str,
    amount: i64,
    issuer: &str,
    category: &str,
) -> bool {
    if amount == 0 || issuer == ISSUER_PLACEHOLDER {
        return false;
    }

    let mut day = day_entry(records, day_key).unwrap_or_else(|| ExpenseDay::new(day_key));
    day.text.push(amount);
    day.issuers.push(issuer.to_string());
    day.categories.push(category.to_string());
    replace_day(records, day);
    true
}

/// Removes one expense line by index, replacing the day's entry and marking
/// it dirty. Out-of-range indexes leave the snapshot untouched.
pub fn remove_expense(records: &mut Vec<Record>, day_key: &str, index: usize) -> bool {
    let Some(mut day) = day_entry(records, day_key) else {
        return false;
    };
    if index >= day.text.len() {
        return false;
    }

    day.text.remove(index);
    day.issuers.remove(index);
    day.categories.remove(index);
    replace_day(records, day);
    true
}

/// Monthly summary table: amounts accumulated per category and issuer.
///
/// Row and column order is alphabetical, which keeps the table stable
/// across re-renders regardless of entry order.
pub fn summary(records: &[Record]) -> BTreeMap<String, BTreeMap<String, i64>> {
    let mut table: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for day in records.iter().filter_map(decode_record::<ExpenseDay>) {
        for index in 0..day.text.len() {
            let (Some(issuer), Some(category)) =
                (day.issuers.get(index), day.categories.get(index))
            else {
                continue;
            };
            *table
                .entry(category.clone())
                .or_default()
                .entry(issuer.clone())
                .or_default() += day.text[index];
        }
    }
    table
}

fn replace_day(records: &mut Vec<Record>, mut day: ExpenseDay) {
    records.retain(|record| record.id != day.id);
    day.edit = Some(true);
    if let Some(record) = encode_record(&day) {
        records.push(record);
    }
}
