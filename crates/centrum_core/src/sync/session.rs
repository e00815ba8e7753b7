//! Cancellable per-module sync session.
//!
//! # Responsibility
//! - Drive one module's reconciliation on a fixed-delay timer.
//! - Enforce the single-flight guard and deterministic cancellation.
//!
//! # Invariants
//! - Each tick is scheduled only after the previous cycle's work completes
//!   (fixed delay, not fixed rate).
//! - A tick arriving while a cycle is in flight is dropped entirely; no
//!   queueing, no coalescing.
//! - Dropping the session stops and joins the worker thread, so a stale
//!   loop can never outlive a module switch.

use crate::model::module::ModuleId;
use crate::sync::coordinator::ModuleSync;
use crate::sync::status::SyncStatus;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

/// Fixed delay between reconciliation cycles.
pub const SYNC_INTERVAL: Duration = Duration::from_millis(2000);

struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    fn new() -> Self {
        Self {
            stopped: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Waits up to `timeout`; returns true when the session was stopped.
    fn wait(&self, timeout: Duration) -> bool {
        let guard = lock_ignoring_poison(&self.stopped);
        let (guard, _) = self
            .condvar
            .wait_timeout_while(guard, timeout, |stopped| !*stopped)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard
    }

    fn stop(&self) {
        let mut guard = lock_ignoring_poison(&self.stopped);
        *guard = true;
        self.condvar.notify_all();
    }

    fn is_stopped(&self) -> bool {
        *lock_ignoring_poison(&self.stopped)
    }
}

/// Running sync loop for one active module.
///
/// Created when a module becomes active; dropping it (on module switch or
/// shutdown) cancels the timer deterministically.
pub struct SyncSession {
    module: ModuleId,
    status: Arc<Mutex<SyncStatus>>,
    in_flight: Arc<AtomicBool>,
    signal: Arc<StopSignal>,
    worker: Option<JoinHandle<()>>,
}

impl SyncSession {
    /// Starts the session with the production interval.
    pub fn start(sync: Box<dyn ModuleSync>) -> Self {
        Self::start_with_interval(sync, SYNC_INTERVAL)
    }

    /// Starts the session with a caller-chosen interval (tests use short
    /// delays).
    pub fn start_with_interval(mut sync: Box<dyn ModuleSync>, interval: Duration) -> Self {
        let module = sync.module();
        let status = Arc::new(Mutex::new(SyncStatus::new()));
        let in_flight = Arc::new(AtomicBool::new(false));
        let signal = Arc::new(StopSignal::new());

        let worker_status = Arc::clone(&status);
        let worker_flag = Arc::clone(&in_flight);
        let worker_signal = Arc::clone(&signal);

        let worker = std::thread::spawn(move || {
            info!("event=sync_session module=sync status=start module_id={module}");
            run_cycle(&worker_flag, &worker_status, module, |status| {
                sync.activate(status)
            });

            loop {
                if worker_signal.wait(interval) {
                    break;
                }
                run_cycle(&worker_flag, &worker_status, module, |status| {
                    sync.tick(status)
                });
            }
            info!("event=sync_session module=sync status=stop module_id={module}");
        });

        Self {
            module,
            status,
            in_flight,
            signal,
            worker: Some(worker),
        }
    }

    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// Snapshot of the current status flags.
    pub fn status(&self) -> SyncStatus {
        *lock_ignoring_poison(&self.status)
    }

    /// Returns whether a cycle is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Stops the loop and joins the worker. Idempotent.
    pub fn stop(&mut self) {
        self.signal.stop();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    /// Returns whether stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.signal.is_stopped()
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Runs one guarded cycle; drops the cycle when another is in flight.
fn run_cycle<F>(in_flight: &AtomicBool, status: &Mutex<SyncStatus>, module: ModuleId, work: F)
where
    F: FnOnce(&mut SyncStatus),
{
    if in_flight.swap(true, Ordering::SeqCst) {
        debug!("event=sync_tick module=sync status=dropped module_id={module} error_code=cycle_in_flight");
        return;
    }

    {
        let mut guard = lock_ignoring_poison(status);
        guard.sync_in_flight = true;
    }

    let mut working = *lock_ignoring_poison(status);
    work(&mut working);
    working.sync_in_flight = false;

    {
        let mut guard = lock_ignoring_poison(status);
        *guard = working;
    }
    in_flight.store(false, Ordering::SeqCst);
}

fn lock_ignoring_poison<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::{run_cycle, SyncSession};
    use crate::model::module::ModuleId;
    use crate::sync::coordinator::ModuleSync;
    use crate::sync::status::SyncStatus;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct CountingSync {
        module: ModuleId,
        activations: Arc<AtomicUsize>,
        ticks: Arc<AtomicUsize>,
    }

    impl ModuleSync for CountingSync {
        fn module(&self) -> ModuleId {
            self.module
        }

        fn activate(&mut self, status: &mut SyncStatus) {
            self.activations.fetch_add(1, Ordering::SeqCst);
            status.synchronized = true;
        }

        fn tick(&mut self, _status: &mut SyncStatus) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn session_activates_once_and_ticks_until_stopped() {
        let activations = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::new(AtomicUsize::new(0));
        let sync = CountingSync {
            module: ModuleId(1),
            activations: Arc::clone(&activations),
            ticks: Arc::clone(&ticks),
        };

        let mut session =
            SyncSession::start_with_interval(Box::new(sync), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(120));
        session.stop();

        assert_eq!(activations.load(Ordering::SeqCst), 1);
        assert!(ticks.load(Ordering::SeqCst) >= 2);
        assert!(session.is_stopped());
        assert!(session.status().synchronized);
    }

    #[test]
    fn stop_is_idempotent_and_prompt() {
        let sync = CountingSync {
            module: ModuleId(2),
            activations: Arc::new(AtomicUsize::new(0)),
            ticks: Arc::new(AtomicUsize::new(0)),
        };

        let mut session =
            SyncSession::start_with_interval(Box::new(sync), Duration::from_secs(3600));
        session.stop();
        session.stop();
        assert!(session.is_stopped());
    }

    #[test]
    fn guarded_cycle_is_dropped_while_another_is_in_flight() {
        let in_flight = AtomicBool::new(true);
        let status = Mutex::new(SyncStatus::new());
        let ran = AtomicUsize::new(0);

        run_cycle(&in_flight, &status, ModuleId(1), |_status| {
            ran.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(ran.load(Ordering::SeqCst), 0);

        in_flight.store(false, Ordering::SeqCst);
        run_cycle(&in_flight, &status, ModuleId(1), |status| {
            ran.fetch_add(1, Ordering::SeqCst);
            status.synchronized = true;
        });
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert!(!in_flight.load(Ordering::SeqCst));

        let final_status = status.lock().expect("status lock should not poison");
        assert!(final_status.synchronized);
        assert!(!final_status.sync_in_flight);
    }
}
