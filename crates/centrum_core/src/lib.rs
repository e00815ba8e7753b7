//! Core domain logic for Centrum, a shared family organizer.
//! This crate is the single source of truth for the sync invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod modules;
pub mod remote;
pub mod repo;
pub mod settings;
pub mod sync;

pub use auth::session_service::{hash_password, AuthError, AuthResult, SessionService};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::module::{module_info, ModuleId, ModuleInfo, MODULES};
pub use model::record::{Record, RecordId};
pub use remote::{HttpDataService, RemoteDataService};
pub use repo::cache_repo::{CacheError, CacheResult, CacheStore, SqliteCacheStore};
pub use repo::record_repo::RecordStore;
pub use sync::coordinator::{ModuleSync, SyncCoordinator};
pub use sync::session::{SyncSession, SYNC_INTERVAL};
pub use sync::status::SyncStatus;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
