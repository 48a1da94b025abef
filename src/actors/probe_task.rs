//! Per-host probe task
//!
//! Each monitored host gets its own actor: an infinite loop that probes at
//! the configured interval, publishes the result on the observer bus, and
//! appends it to the log sink. The loop is strictly sequential per host, so
//! log lines land in probe order.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → registry check → probe → publish ProbeEvent → append log line
//!     ↑
//!     └─── Commands (ProbeNow, UpdateInterval, Shutdown)
//! ```
//!
//! Cancellation is cooperative: `Shutdown` wins the `select!` against the
//! ticker, so the inter-probe sleep is interruptible but an in-flight probe
//! always completes. If the host vanishes from the registry the loop exits
//! on its own at the next tick, even if no explicit eviction reached it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, instrument, trace, warn};

use crate::ProbeOutcome;
use crate::probe::Prober;
use crate::registry::{HostEntry, HostRegistry};
use crate::storage::LogSink;

use super::messages::{MonitorEvent, ProbeCommand, ProbeEvent};

/// Actor that monitors a single host
pub struct HostProbeActor {
    /// The host this task owns
    entry: HostEntry,

    /// Probe transport
    prober: Arc<dyn Prober>,

    /// Authoritative host list, double-checked at every tick
    registry: Arc<HostRegistry>,

    /// Destination for result lines
    sink: Arc<dyn LogSink>,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<ProbeCommand>,

    /// Broadcast sender for publishing results
    event_tx: broadcast::Sender<MonitorEvent>,

    /// Current inter-probe interval
    interval_duration: Duration,
}

impl HostProbeActor {
    fn new(
        entry: HostEntry,
        prober: Arc<dyn Prober>,
        registry: Arc<HostRegistry>,
        sink: Arc<dyn LogSink>,
        command_rx: mpsc::Receiver<ProbeCommand>,
        event_tx: broadcast::Sender<MonitorEvent>,
        interval_duration: Duration,
    ) -> Self {
        Self {
            entry,
            prober,
            registry,
            sink,
            command_rx,
            event_tx,
            interval_duration,
        }
    }

    /// Run the actor's main loop until shutdown or host removal.
    #[instrument(skip(self), fields(host = %self.entry.address))]
    pub async fn run(mut self) {
        debug!("starting probe task");

        let mut ticker = interval(self.interval_duration);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.registry.contains(&self.entry.address) {
                        debug!("host no longer registered, exiting");
                        break;
                    }
                    self.probe_once().await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        ProbeCommand::ProbeNow { respond_to } => {
                            debug!("received ProbeNow command");
                            let outcome = self.probe_once().await;
                            let _ = respond_to.send(outcome);
                        }

                        ProbeCommand::UpdateInterval { interval: new_interval } => {
                            debug!("updating interval to {new_interval:?}");
                            self.interval_duration = new_interval;
                            ticker = interval(self.interval_duration);
                        }

                        ProbeCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                // Command channel closed - exit
                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("probe task stopped");
    }

    /// Probe the host once and deliver the result.
    ///
    /// Delivery order: observer bus first, then the log sink, both before
    /// the next sleep. Neither delivery failure stops the loop; a failed
    /// append is surfaced to observers as `LogDegraded`.
    async fn probe_once(&self) -> ProbeOutcome {
        let outcome = self.prober.probe(&self.entry.address).await;
        let timestamp = Local::now();

        let event = ProbeEvent {
            address: self.entry.address.clone(),
            label: self.entry.label.clone(),
            timestamp,
            outcome: outcome.clone(),
        };
        let line = event.log_line();

        // It's OK if there are no subscribers; slow subscribers lag and
        // drop instead of blocking this loop.
        if self.event_tx.send(MonitorEvent::Probe(event)).is_err() {
            trace!("no receivers for probe event");
        }

        if let Err(e) = self.sink.append(&self.entry.address, timestamp, &line).await {
            warn!("failed to append log line: {e}");
            let _ = self.event_tx.send(MonitorEvent::LogDegraded {
                address: self.entry.address.clone(),
                timestamp: Local::now(),
                reason: e.to_string(),
            });
        }

        outcome
    }
}

/// Handle for controlling a probe task
///
/// Cloneable; the supervisor keeps one per active host.
#[derive(Clone)]
pub struct ProbeHandle {
    sender: mpsc::Sender<ProbeCommand>,
    address: String,
}

impl ProbeHandle {
    /// Spawn a probe task for `entry` and return its handle plus the join
    /// handle of the underlying tokio task.
    pub fn spawn(
        entry: HostEntry,
        prober: Arc<dyn Prober>,
        registry: Arc<HostRegistry>,
        sink: Arc<dyn LogSink>,
        event_tx: broadcast::Sender<MonitorEvent>,
        interval_duration: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let address = entry.address.clone();

        let actor = HostProbeActor::new(
            entry,
            prober,
            registry,
            sink,
            cmd_rx,
            event_tx,
            interval_duration,
        );

        let join = tokio::spawn(actor.run());

        (Self { sender: cmd_tx, address }, join)
    }

    /// Probe immediately, bypassing the interval timer.
    pub async fn probe_now(&self) -> Result<ProbeOutcome> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ProbeCommand::ProbeNow { respond_to: tx })
            .await
            .context("failed to send ProbeNow command")?;

        rx.await.context("failed to receive probe outcome")
    }

    /// Change the inter-probe interval.
    pub async fn update_interval(&self, interval: Duration) -> Result<()> {
        self.sender
            .send(ProbeCommand::UpdateInterval { interval })
            .await
            .context("failed to send UpdateInterval command")?;
        Ok(())
    }

    /// Ask the task to exit its loop. The task finishes any in-flight
    /// probe first; it is not killed.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(ProbeCommand::Shutdown).await;
    }

    /// Address of the host this handle controls
    pub fn address(&self) -> &str {
        &self.address
    }
}
