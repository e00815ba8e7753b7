//! Repository layer over the durable key-value cache.
//!
//! # Responsibility
//! - Define the string-keyed JSON blob cache contract.
//! - Provide whole-snapshot record persistence per module on top of it.
//!
//! # Invariants
//! - Cache writes are last-write-wins; there is no partial-record API.
//! - Malformed cached payloads degrade to an empty snapshot, never an error.

pub mod cache_repo;
pub mod keys;
pub mod record_repo;
