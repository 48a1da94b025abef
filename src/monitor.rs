//! Monitor facade
//!
//! Wires the host registry, the probe supervisor, the probe transport and
//! the log sink together and exposes the control surface consumed by a CLI
//! or any other front end. The facade never touches presentation state;
//! live results are consumed by subscribing to the event bus.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::actors::messages::MonitorEvent;
use crate::actors::supervisor::ProbeSupervisor;
use crate::config::Config;
use crate::probe::{IcmpProber, Prober};
use crate::registry::{HostEntry, HostRegistry, RegistryError};
use crate::storage::{FileLogSink, LogSink};

/// Capacity of the observer bus. Slow observers lag and drop events rather
/// than blocking the probe loops.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Control surface of the reachability monitor
pub struct Monitor {
    registry: Arc<HostRegistry>,
    supervisor: ProbeSupervisor,
    event_tx: broadcast::Sender<MonitorEvent>,
}

impl Monitor {
    /// Assemble a monitor from its parts. Tests inject scripted probers and
    /// in-memory sinks here.
    pub fn new(
        registry: Arc<HostRegistry>,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn LogSink>,
        interval: Duration,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let supervisor = ProbeSupervisor::new(
            registry.clone(),
            prober,
            sink,
            event_tx.clone(),
            interval,
        );

        Self {
            registry,
            supervisor,
            event_tx,
        }
    }

    /// Production wiring: registry file, ICMP prober, per-day file logs.
    pub fn from_config(config: &Config) -> Self {
        let registry = Arc::new(HostRegistry::load(&config.registry_path));
        let prober = Arc::new(IcmpProber::new(Duration::from_secs(config.timeout)));
        let sink = Arc::new(FileLogSink::new(&config.log_dir));

        Self::new(registry, prober, sink, Duration::from_secs(config.interval))
    }

    /// Register a host and, when the monitor is running, start probing it
    /// immediately. Success means the registry file was updated.
    pub async fn add_host(&self, address: &str, label: &str) -> Result<(), RegistryError> {
        let entry = self.registry.add(address, label)?;
        self.supervisor.reconcile(entry).await;
        Ok(())
    }

    /// Deregister a host and cancel its probe task. No further log lines
    /// are appended for it once the task has observed the removal.
    pub async fn remove_host(&self, address: &str) -> Result<(), RegistryError> {
        self.registry.remove(address)?;
        self.supervisor.evict(address).await;
        Ok(())
    }

    /// Start probing every registered host. No-op when already running.
    pub async fn start_all(&self) {
        self.supervisor.start().await;
    }

    /// Signal every probe task to stop. Idempotent; returns after
    /// signalling, tasks wind down on their own.
    pub async fn stop_all(&self) {
        self.supervisor.stop().await;
    }

    /// Snapshot of registered hosts in insertion order.
    pub fn list_hosts(&self) -> Vec<HostEntry> {
        self.registry.list()
    }

    /// Subscribe to live probe results and degradation notices.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.event_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.supervisor.is_running()
    }

    /// Addresses with a live probe task, for introspection.
    pub async fn active_hosts(&self) -> Vec<String> {
        self.supervisor.active_hosts().await
    }

    /// Stop everything and wait until every probe task has fully exited.
    pub async fn shutdown(&self) {
        self.supervisor.stop().await;
        self.supervisor.drain().await;
    }
}
