//! Whole-snapshot record persistence per module.
//!
//! # Responsibility
//! - Load and save a module's full record snapshot from its cache partition.
//! - Absorb malformed payloads into an empty snapshot.
//!
//! # Invariants
//! - There is no partial merge; callers always supply the full desired state.
//! - Parse failures are swallowed and logged, never surfaced as errors.

use crate::model::module::ModuleId;
use crate::model::record::Record;
use crate::repo::cache_repo::{CacheResult, CacheStore};
use crate::repo::keys::module_data_key;
use log::warn;

/// Snapshot view over one cache partition.
///
/// Borrows the cache the way SQLite repositories borrow their connection;
/// the owning component decides the cache lifetime.
pub struct RecordStore<'c, C: CacheStore + ?Sized> {
    cache: &'c C,
}

impl<'c, C: CacheStore + ?Sized> RecordStore<'c, C> {
    pub fn new(cache: &'c C) -> Self {
        Self { cache }
    }

    /// Loads the module snapshot.
    ///
    /// Returns an empty snapshot when the partition is absent or its payload
    /// does not parse; only cache transport failures propagate.
    pub fn load(&self, module: ModuleId) -> CacheResult<Vec<Record>> {
        let key = module_data_key(module);
        let Some(raw) = self.cache.get(&key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Record>>(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(
                    "event=record_load module=repo status=degraded key={key} error_code=malformed_snapshot error={err}"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrites the module snapshot with the provided records.
    pub fn save(&self, module: ModuleId, records: &[Record]) -> CacheResult<()> {
        let key = module_data_key(module);
        // Vec<Record> serialization cannot fail: keys are strings and values
        // are already serde_json values.
        let payload = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
        self.cache.set(&key, &payload)
    }
}
