//! Local/remote reconciliation core.
//!
//! # Responsibility
//! - Reconcile the durable record cache with the remote data service for one
//!   active module at a time.
//! - Surface coarse sync status flags to the presentation layer.
//!
//! # Invariants
//! - Within one module's loop, fetch always precedes the push-confirmation
//!   re-fetch of a cycle.
//! - Divergence is resolved last-remote-wins; there is no field-level merge.
//! - All network and parse failures are absorbed into status flags or a
//!   credential purge; nothing propagates out of the loop.

pub mod coordinator;
pub mod session;
pub mod status;

pub use coordinator::{FetchOutcome, ModuleSync, PushOutcome, SyncCoordinator};
pub use session::{SyncSession, SYNC_INTERVAL};
pub use status::SyncStatus;
