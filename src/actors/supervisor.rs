//! Probe supervisor
//!
//! Owns one probe task per registered host and keeps the active-task set
//! reconciled with the host registry. Two states: stopped (initial) and
//! running.
//!
//! ## Duplicate-task prevention
//!
//! Two concurrent loops writing to the same host's log stream is a
//! forbidden state. Tasks that were signalled to stop park their join
//! handles in a draining map; spawning for an address first awaits any
//! parked handle for it. `stop()` therefore returns right after signalling
//! every task, while a later `start()` still cannot double-spawn a host
//! whose old loop is mid-probe.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};

use crate::probe::Prober;
use crate::registry::{HostEntry, HostRegistry};
use crate::storage::LogSink;

use super::messages::MonitorEvent;
use super::probe_task::ProbeHandle;

struct TaskEntry {
    handle: ProbeHandle,
    join: JoinHandle<()>,
}

/// Supervises one probe task per monitored host
///
/// Control methods (`start`, `stop`, `reconcile`, `evict`) are called from
/// the control surface; the task map and running flag are synchronized so
/// they are safe against each other and against task loops reading the
/// registry.
pub struct ProbeSupervisor {
    registry: Arc<HostRegistry>,
    prober: Arc<dyn Prober>,
    sink: Arc<dyn LogSink>,
    event_tx: broadcast::Sender<MonitorEvent>,
    interval: Duration,
    running: AtomicBool,

    /// Active tasks keyed by host address
    tasks: Mutex<HashMap<String, TaskEntry>>,

    /// Join handles of tasks that were signalled but may not have exited
    draining: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ProbeSupervisor {
    pub fn new(
        registry: Arc<HostRegistry>,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn LogSink>,
        event_tx: broadcast::Sender<MonitorEvent>,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            prober,
            sink,
            event_tx,
            interval,
            running: AtomicBool::new(false),
            tasks: Mutex::new(HashMap::new()),
            draining: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start monitoring every registered host. No-op when already running.
    #[instrument(skip(self))]
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            trace!("already running");
            return;
        }

        debug!("starting probe supervisor");
        for entry in self.registry.list() {
            self.spawn_task(entry).await;
        }
    }

    /// Stop all probe tasks. Idempotent.
    ///
    /// Returns once every task has been signalled; tasks exit on their own
    /// at the next loop boundary (an in-flight probe completes first).
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);

        let mut tasks = self.tasks.lock().await;
        if tasks.is_empty() {
            return;
        }

        debug!("stopping {} probe tasks", tasks.len());
        let mut draining = self.draining.lock().await;
        for (address, entry) in tasks.drain() {
            entry.handle.shutdown().await;
            draining.insert(address, entry.join);
        }
    }

    /// Bring a newly registered host under supervision.
    ///
    /// Spawns a task immediately when running and none exists for the
    /// address, so hosts added mid-session join without another `start`.
    /// Also respawns hosts whose previous task exited on its own.
    pub async fn reconcile(&self, entry: HostEntry) {
        if !self.is_running() {
            trace!("not running, {} will be picked up on start", entry.address);
            return;
        }

        self.spawn_task(entry).await;
    }

    /// Cancel and forget the task for `address`, regardless of running
    /// state. Idempotent when no task exists.
    #[instrument(skip(self))]
    pub async fn evict(&self, address: &str) {
        let mut tasks = self.tasks.lock().await;

        if let Some(entry) = tasks.remove(address) {
            debug!("evicting probe task");
            entry.handle.shutdown().await;
            self.draining.lock().await.insert(address.to_string(), entry.join);
        }
    }

    /// Addresses with a live probe task.
    pub async fn active_hosts(&self) -> Vec<String> {
        let tasks = self.tasks.lock().await;
        tasks
            .iter()
            .filter(|(_, entry)| !entry.join.is_finished())
            .map(|(address, _)| address.clone())
            .collect()
    }

    /// Wait for every signalled task to fully exit.
    pub async fn drain(&self) {
        let joins: Vec<_> = {
            let mut draining = self.draining.lock().await;
            draining.drain().map(|(_, join)| join).collect()
        };

        if !joins.is_empty() {
            debug!("draining {} exiting probe tasks", joins.len());
            join_all(joins).await;
        }
    }

    /// Spawn a task for `entry` unless one is already live.
    ///
    /// Awaits any draining predecessor for the same address first, which
    /// upholds the at-most-one-task-per-address invariant across rapid
    /// stop/start and remove/add sequences.
    async fn spawn_task(&self, entry: HostEntry) {
        let mut tasks = self.tasks.lock().await;

        if let Some(existing) = tasks.get(&entry.address) {
            if !existing.join.is_finished() {
                trace!("task for {} already active", entry.address);
                return;
            }
            // exited on its own (host vanished from the registry); reap it
            tasks.remove(&entry.address);
        }

        let predecessor = self.draining.lock().await.remove(&entry.address);
        if let Some(join) = predecessor {
            trace!("waiting for previous task for {} to exit", entry.address);
            let _ = join.await;
        }

        debug!("spawning probe task for {} ({})", entry.address, entry.label);
        let (handle, join) = ProbeHandle::spawn(
            entry.clone(),
            self.prober.clone(),
            self.registry.clone(),
            self.sink.clone(),
            self.event_tx.clone(),
            self.interval,
        );

        tasks.insert(entry.address, TaskEntry { handle, join });
    }
}
