//! Fetch/diff/push reconciliation for one active module.
//!
//! # Responsibility
//! - Pull the server snapshot, diff it against the local store and overwrite
//!   on divergence (last-remote-wins).
//! - Push locally-dirty records and confirm convergence with a re-fetch.
//!
//! # Invariants
//! - Snapshots are compared sorted by id ascending with full structural
//!   equality.
//! - A push cycle with zero dirty records performs zero network calls.
//! - Unrecoverable HTTP statuses purge the session credential; soft statuses
//!   and network errors degrade to a no-change cycle.

use crate::auth::{clear_session_token, session_token};
use crate::model::module::ModuleId;
use crate::model::record::{dirty_records, snapshots_equal, snapshots_equal_normalized};
use crate::remote::{RemoteDataService, RemoteError};
use crate::repo::cache_repo::{CacheResult, CacheStore};
use crate::repo::record_repo::RecordStore;
use crate::sync::status::SyncStatus;
use log::{error, info, warn};

/// Statuses the data service emits for recoverable request problems; they
/// never invalidate the session.
pub const SOFT_FAIL_STATUSES: [u16; 3] = [400, 404, 500];

/// Outcome of one fetch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Server and local snapshots are structurally equal; no store write.
    Unchanged,
    /// Store was overwritten with the server snapshot. `new_data` is true
    /// when the divergence was not explained by this device's own edits.
    Replaced { new_data: bool },
    /// Recoverable failure; treated as no change.
    SoftFailure,
    /// Credential missing or purged; login boundary must take over.
    AuthRequired,
}

/// Outcome of one push pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// No dirty records; no network call was made.
    NothingToPush,
    /// Dirty set accepted by the server.
    Pushed,
    /// Credential missing or purged.
    AuthRequired,
}

/// One active module's sync behavior, driven by a `SyncSession`.
pub trait ModuleSync: Send {
    fn module(&self) -> ModuleId;
    /// Initial fetch when the module becomes active.
    fn activate(&mut self, status: &mut SyncStatus);
    /// One timer-driven push/re-fetch cycle.
    fn tick(&mut self, status: &mut SyncStatus);
}

/// Reconciles one module's cache partition with the remote service.
pub struct SyncCoordinator<C: CacheStore, R: RemoteDataService> {
    cache: C,
    remote: R,
    module: ModuleId,
}

impl<C: CacheStore, R: RemoteDataService> SyncCoordinator<C, R> {
    pub fn new(cache: C, remote: R, module: ModuleId) -> Self {
        Self {
            cache,
            remote,
            module,
        }
    }

    /// Fetches the server snapshot and reconciles the local store.
    ///
    /// # Errors
    /// Only cache transport failures propagate; every remote failure is
    /// folded into the outcome.
    pub fn fetch(&self) -> CacheResult<FetchOutcome> {
        let module = self.module;
        let Some(token) = session_token(&self.cache)? else {
            warn!("event=sync_fetch module=sync status=auth_required module_id={module} error_code=missing_token");
            return Ok(FetchOutcome::AuthRequired);
        };

        let server = match self.remote.fetch_records(&token, module) {
            Ok(records) => records,
            Err(RemoteError::Status(status)) if SOFT_FAIL_STATUSES.contains(&status) => {
                warn!(
                    "event=sync_fetch module=sync status=soft_failure module_id={module} http_status={status}"
                );
                return Ok(FetchOutcome::SoftFailure);
            }
            Err(err @ (RemoteError::Transport(_) | RemoteError::Decode(_))) => {
                warn!(
                    "event=sync_fetch module=sync status=soft_failure module_id={module} error={err}"
                );
                return Ok(FetchOutcome::SoftFailure);
            }
            Err(RemoteError::Status(status)) => {
                warn!(
                    "event=sync_fetch module=sync status=auth_required module_id={module} http_status={status}"
                );
                clear_session_token(&self.cache)?;
                return Ok(FetchOutcome::AuthRequired);
            }
        };

        let store = RecordStore::new(&self.cache);
        let local = store.load(module)?;

        if snapshots_equal(&local, &server) {
            return Ok(FetchOutcome::Unchanged);
        }

        // Server snapshot wins unconditionally on divergence; local edits
        // and their dirty flags are replaced wholesale.
        store.save(module, &server)?;
        let new_data = !snapshots_equal_normalized(&local, &server);
        info!(
            "event=sync_fetch module=sync status=replaced module_id={module} record_count={} new_data={new_data}",
            server.len()
        );
        Ok(FetchOutcome::Replaced { new_data })
    }

    /// Pushes the dirty record set, if any.
    ///
    /// # Errors
    /// Only cache transport failures propagate.
    pub fn push(&self) -> CacheResult<PushOutcome> {
        let module = self.module;
        let Some(token) = session_token(&self.cache)? else {
            warn!("event=sync_push module=sync status=auth_required module_id={module} error_code=missing_token");
            return Ok(PushOutcome::AuthRequired);
        };

        let store = RecordStore::new(&self.cache);
        let local = store.load(module)?;
        let dirty = dirty_records(&local);
        if dirty.is_empty() {
            return Ok(PushOutcome::NothingToPush);
        }

        match self.remote.push_records(&token, module, &dirty) {
            Ok(()) => {
                info!(
                    "event=sync_push module=sync status=ok module_id={module} record_count={}",
                    dirty.len()
                );
                Ok(PushOutcome::Pushed)
            }
            Err(err) => {
                // Push failures force re-authentication; the next login
                // re-establishes a clean session before anything retries.
                warn!("event=sync_push module=sync status=auth_required module_id={module} error={err}");
                clear_session_token(&self.cache)?;
                Ok(PushOutcome::AuthRequired)
            }
        }
    }

    fn apply_fetch(status: &mut SyncStatus, outcome: FetchOutcome, activation: bool) {
        match outcome {
            FetchOutcome::Unchanged => {
                status.synchronized = true;
                status.has_new_data = false;
            }
            FetchOutcome::Replaced { new_data: false } => {
                status.synchronized = true;
                status.has_new_data = false;
            }
            FetchOutcome::Replaced { new_data: true } => {
                status.has_new_data = true;
                // The badge shows new data until the next converged cycle;
                // activation still counts the module as synchronized.
                if activation {
                    status.synchronized = true;
                }
            }
            FetchOutcome::SoftFailure => {
                if activation {
                    status.synchronized = true;
                }
            }
            FetchOutcome::AuthRequired => {
                status.synchronized = false;
                status.auth_required = true;
            }
        }
    }
}

impl<C, R> ModuleSync for SyncCoordinator<C, R>
where
    C: CacheStore + Send,
    R: RemoteDataService + Send,
{
    fn module(&self) -> ModuleId {
        self.module
    }

    fn activate(&mut self, status: &mut SyncStatus) {
        match self.fetch() {
            Ok(outcome) => Self::apply_fetch(status, outcome, true),
            Err(err) => {
                error!(
                    "event=sync_activate module=sync status=error module_id={} error={err}",
                    self.module
                );
            }
        }
    }

    fn tick(&mut self, status: &mut SyncStatus) {
        let push_outcome = match self.push() {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    "event=sync_tick module=sync status=error module_id={} error={err}",
                    self.module
                );
                return;
            }
        };

        match push_outcome {
            PushOutcome::NothingToPush => {}
            PushOutcome::AuthRequired => {
                status.synchronized = false;
                status.auth_required = true;
            }
            PushOutcome::Pushed => {
                // Transiently unsynchronized until the re-fetch confirms the
                // server converged on our edits.
                status.synchronized = false;
                match self.fetch() {
                    Ok(outcome) => Self::apply_fetch(status, outcome, false),
                    Err(err) => {
                        error!(
                            "event=sync_tick module=sync status=error module_id={} error={err}",
                            self.module
                        );
                    }
                }
            }
        }
    }
}
