//! Typed staging views over the opaque module records.
//!
//! # Responsibility
//! - Give each module screen a typed projection of its snapshot.
//! - Stage local edits back into the snapshot with the dirty flag set.
//!
//! # Invariants
//! - Every mutation marks the touched record `edit=true`.
//! - Removal is tombstoning (text blanked), so the deletion still syncs.
//! - Views never talk to the cache or the network; the caller owns
//!   persistence through the record store.

use crate::model::record::Record;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod calendar;
pub mod expenses;
pub mod notes;
pub mod points;
pub mod tales;
pub mod tasks;
pub mod watchlist;

/// Decodes one record into a typed view; records with a foreign shape are
/// skipped by the callers, never dropped from the snapshot.
pub(crate) fn decode_record<T: DeserializeOwned>(record: &Record) -> Option<T> {
    let value = serde_json::to_value(record).ok()?;
    serde_json::from_value(value).ok()
}

/// Encodes a typed view back into the canonical record shape.
pub(crate) fn encode_record<T: Serialize>(item: &T) -> Option<Record> {
    let value = serde_json::to_value(item).ok()?;
    serde_json::from_value(value).ok()
}
