//! Domain model for organizer modules and their records.
//!
//! # Responsibility
//! - Define the canonical record shape shared by every module screen.
//! - Define the fixed module registry addressed by small integer ids.
//!
//! # Invariants
//! - Exactly one record per id within a module; ids are never reused.
//! - Deletion is represented by blank-text tombstones, not hard delete.

pub mod module;
pub mod record;
