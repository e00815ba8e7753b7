use centrum_core::auth::{clear_session_token, session_token, store_session_token};
use centrum_core::model::module::ModuleId;
use centrum_core::model::record::{Record, RecordId};
use centrum_core::remote::{RemoteDataService, RemoteError, RemoteResult};
use centrum_core::repo::cache_repo::{CacheResult, CacheStore};
use centrum_core::repo::record_repo::RecordStore;
use centrum_core::sync::coordinator::{FetchOutcome, ModuleSync, PushOutcome, SyncCoordinator};
use centrum_core::SqliteCacheStore;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const MODULE: ModuleId = ModuleId(1);

/// Plain in-memory cache; `Sync` so borrowed handles satisfy the loop's
/// `Send` bound while the test keeps its own.
#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Scriptable remote double: fetch results are consumed front to back and
/// every call is counted.
#[derive(Default)]
struct ScriptedRemote {
    fetch_results: Mutex<VecDeque<RemoteResult<Vec<Record>>>>,
    push_result: Mutex<Option<RemoteResult<()>>>,
    fetch_calls: AtomicUsize,
    push_calls: AtomicUsize,
    pushed: Mutex<Vec<Vec<Record>>>,
}

impl ScriptedRemote {
    fn script_fetch(&self, result: RemoteResult<Vec<Record>>) {
        self.fetch_results.lock().unwrap().push_back(result);
    }

    fn script_push(&self, result: RemoteResult<()>) {
        *self.push_result.lock().unwrap() = Some(result);
    }

    fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn push_calls(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }

    fn last_pushed(&self) -> Vec<Record> {
        self.pushed.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl RemoteDataService for ScriptedRemote {
    fn fetch_records(&self, _token: &str, _module: ModuleId) -> RemoteResult<Vec<Record>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted fetch call")
    }

    fn push_records(
        &self,
        _token: &str,
        _module: ModuleId,
        records: &[Record],
    ) -> RemoteResult<()> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        self.pushed.lock().unwrap().push(records.to_vec());
        self.push_result
            .lock()
            .unwrap()
            .clone()
            .expect("unscripted push call")
    }

    fn probe_session(&self, _token: &str) -> RemoteResult<()> {
        Ok(())
    }

    fn login(&self, _email: &str, _hashed_password: &str) -> RemoteResult<String> {
        Ok("tok".to_string())
    }
}

fn record(id: i64, text: &str, edit: Option<bool>) -> Record {
    let mut record = Record::new(RecordId::Int(id));
    record.edit = edit;
    record.set_field("text", json!(text));
    record
}

fn seed(cache: &MemoryCache, records: &[Record]) {
    store_session_token(cache, "tok").unwrap();
    RecordStore::new(cache).save(MODULE, records).unwrap();
}

#[test]
fn equal_snapshots_fetch_is_a_no_op() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    let local = vec![record(1, "a", Some(false)), record(2, "b", Some(false))];
    seed(&cache, &local);
    // Same records in a different order: still structurally equal.
    remote.script_fetch(Ok(vec![
        record(2, "b", Some(false)),
        record(1, "a", Some(false)),
    ]));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.fetch().unwrap(), FetchOutcome::Unchanged);
    assert_eq!(RecordStore::new(&cache).load(MODULE).unwrap(), local);
}

#[test]
fn divergence_overwrites_local_unconditionally() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    // The local edit loses: last-remote-wins, no merge.
    seed(&cache, &[record(1, "local edit", Some(true))]);
    let server = vec![
        record(1, "server text", Some(false)),
        record(2, "new", Some(false)),
    ];
    remote.script_fetch(Ok(server.clone()));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(
        coordinator.fetch().unwrap(),
        FetchOutcome::Replaced { new_data: true }
    );
    let loaded = RecordStore::new(&cache).load(MODULE).unwrap();
    assert_eq!(loaded, server);
    // The overwrite discarded the local edit; nothing left to push.
    assert_eq!(coordinator.push().unwrap(), PushOutcome::NothingToPush);
}

#[test]
fn own_acknowledged_edit_does_not_raise_new_data() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    // The server echoes the pushed record without a dirty flag; the only
    // difference from the local copy is the flag itself.
    seed(&cache, &[record(1, "a", Some(true))]);
    remote.script_fetch(Ok(vec![record(1, "a", None)]));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(
        coordinator.fetch().unwrap(),
        FetchOutcome::Replaced { new_data: false }
    );
}

#[test]
fn clean_snapshot_pushes_nothing_and_makes_no_network_call() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[record(1, "a", Some(false))]);

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.push().unwrap(), PushOutcome::NothingToPush);
    assert_eq!(remote.push_calls(), 0);
    assert_eq!(remote.fetch_calls(), 0);
}

#[test]
fn push_sends_dirty_and_legacy_records_only() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(
        &cache,
        &[
            record(1, "clean", Some(false)),
            record(2, "edited", Some(true)),
            record(3, "legacy", None),
        ],
    );
    remote.script_push(Ok(()));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.push().unwrap(), PushOutcome::Pushed);

    let pushed = remote.last_pushed();
    let ids: Vec<RecordId> = pushed.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, [RecordId::Int(2), RecordId::Int(3)]);
}

#[test]
fn missing_token_requires_auth_without_network_calls() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    RecordStore::new(&cache)
        .save(MODULE, &[record(1, "a", None)])
        .unwrap();

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.fetch().unwrap(), FetchOutcome::AuthRequired);
    assert_eq!(coordinator.push().unwrap(), PushOutcome::AuthRequired);
    assert_eq!(remote.fetch_calls(), 0);
    assert_eq!(remote.push_calls(), 0);
}

#[test]
fn soft_failure_statuses_leave_local_state_and_token_alone() {
    for status in [400u16, 404, 500] {
        let cache = MemoryCache::default();
        let remote = ScriptedRemote::default();
        let local = vec![record(1, "a", Some(false))];
        seed(&cache, &local);
        remote.script_fetch(Err(RemoteError::Status(status)));

        let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
        assert_eq!(coordinator.fetch().unwrap(), FetchOutcome::SoftFailure);
        assert_eq!(RecordStore::new(&cache).load(MODULE).unwrap(), local);
        assert_eq!(session_token(&cache).unwrap().as_deref(), Some("tok"));
    }
}

#[test]
fn transport_failure_degrades_to_soft_failure() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[record(1, "a", Some(false))]);
    remote.script_fetch(Err(RemoteError::Transport("connection refused".into())));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.fetch().unwrap(), FetchOutcome::SoftFailure);
    assert!(session_token(&cache).unwrap().is_some());
}

#[test]
fn unrecoverable_status_purges_the_session_token() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[record(1, "a", Some(false))]);
    remote.script_fetch(Err(RemoteError::Status(401)));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.fetch().unwrap(), FetchOutcome::AuthRequired);
    assert_eq!(session_token(&cache).unwrap(), None);
}

#[test]
fn rejected_push_purges_the_session_token() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[record(1, "a", Some(true))]);
    remote.script_push(Err(RemoteError::Status(403)));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.push().unwrap(), PushOutcome::AuthRequired);
    assert_eq!(session_token(&cache).unwrap(), None);
}

#[test]
fn activation_fetch_marks_the_module_synchronized() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[]);
    remote.script_fetch(Ok(vec![record(1, "from server", None)]));

    let mut coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    let mut status = centrum_core::SyncStatus::new();
    coordinator.activate(&mut status);

    assert!(status.synchronized);
    assert!(status.has_new_data);
    assert!(!status.auth_required);
    assert_eq!(
        RecordStore::new(&cache).load(MODULE).unwrap(),
        vec![record(1, "from server", None)]
    );
}

#[test]
fn tick_pushes_then_confirms_convergence_with_a_refetch() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[record(1, "a", Some(true))]);
    remote.script_push(Ok(()));
    // Confirmation fetch: server echoes the record with the flag cleared.
    remote.script_fetch(Ok(vec![record(1, "a", Some(false))]));

    let mut coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    let mut status = centrum_core::SyncStatus::new();
    status.synchronized = true;
    coordinator.tick(&mut status);

    assert_eq!(remote.push_calls(), 1);
    assert_eq!(remote.fetch_calls(), 1);
    assert!(status.synchronized);
    assert!(!status.has_new_data);
    // The echoed snapshot replaced the local one, clearing the dirty flag.
    assert_eq!(coordinator.push().unwrap(), PushOutcome::NothingToPush);
}

#[test]
fn tick_with_clean_snapshot_skips_the_network_entirely() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[record(1, "a", Some(false))]);

    let mut coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    let mut status = centrum_core::SyncStatus::new();
    status.synchronized = true;
    coordinator.tick(&mut status);

    assert_eq!(remote.push_calls(), 0);
    assert_eq!(remote.fetch_calls(), 0);
    assert!(status.synchronized);
}

#[test]
fn tick_surfaces_auth_required_when_push_is_rejected() {
    let cache = MemoryCache::default();
    let remote = ScriptedRemote::default();
    seed(&cache, &[record(1, "a", None)]);
    remote.script_push(Err(RemoteError::Status(401)));

    let mut coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    let mut status = centrum_core::SyncStatus::new();
    status.synchronized = true;
    coordinator.tick(&mut status);

    assert!(!status.synchronized);
    assert!(status.auth_required);
    assert_eq!(session_token(&cache).unwrap(), None);
    // No confirmation fetch after a failed push.
    assert_eq!(remote.fetch_calls(), 0);
}

#[test]
fn fetch_and_push_work_against_the_sqlite_cache() {
    let cache = SqliteCacheStore::open_in_memory().unwrap();
    store_session_token(&cache, "tok").unwrap();
    RecordStore::new(&cache)
        .save(MODULE, &[record(1, "a", Some(true))])
        .unwrap();

    let remote = ScriptedRemote::default();
    remote.script_push(Ok(()));
    remote.script_fetch(Ok(vec![record(1, "a", None), record(2, "b", None)]));

    let coordinator = SyncCoordinator::new(&cache, &remote, MODULE);
    assert_eq!(coordinator.push().unwrap(), PushOutcome::Pushed);
    assert_eq!(
        coordinator.fetch().unwrap(),
        FetchOutcome::Replaced { new_data: true }
    );

    clear_session_token(&cache).unwrap();
    assert_eq!(coordinator.fetch().unwrap(), FetchOutcome::AuthRequired);
}
