//! Message types for actor communication
//!
//! Commands go to a specific probe task via its mpsc channel; events fan
//! out to every observer on the broadcast bus. Events are cloneable so the
//! bus can have any number of subscribers.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::oneshot;

use crate::ProbeOutcome;

/// Timestamp format used in log lines and the live view
pub const TIMESTAMP_FORMAT: &str = "%a %m/%d/%Y %I:%M:%S %p";

/// One probe result, produced per loop iteration of a probe task
///
/// Ephemeral: delivered to observers and the log sink, never retained by
/// the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEvent {
    /// Probed host address
    pub address: String,

    /// Label the host was registered with
    pub label: String,

    /// Wall-clock time the probe completed
    pub timestamp: DateTime<Local>,

    /// What came back
    pub outcome: ProbeOutcome,
}

impl ProbeEvent {
    /// Human-readable log line for this result.
    pub fn log_line(&self) -> String {
        let ts = self.timestamp.format(TIMESTAMP_FORMAT);

        match &self.outcome {
            ProbeOutcome::Success { latency } => format!(
                "{ts} - Reply from {}: time={:.2}ms",
                self.address,
                latency.as_secs_f64() * 1000.0
            ),
            ProbeOutcome::Timeout => {
                format!("{ts} - Reply from {}: Request timed out.", self.address)
            }
            ProbeOutcome::TransportError(reason) => {
                format!("{ts} - Probe to {} failed: {}", self.address, reason)
            }
        }
    }
}

/// Notification published on the observer bus
///
/// The bus may lag or drop messages for slow subscribers; probe tasks never
/// block on delivery.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A probe completed
    Probe(ProbeEvent),

    /// A log append failed; probing continues regardless
    LogDegraded {
        address: String,
        timestamp: DateTime<Local>,
        reason: String,
    },
}

/// Commands that can be sent to a probe task
#[derive(Debug)]
pub enum ProbeCommand {
    /// Probe immediately, bypassing the interval timer
    ProbeNow {
        /// Channel the resulting outcome is sent back on
        respond_to: oneshot::Sender<ProbeOutcome>,
    },

    /// Change the inter-probe interval
    UpdateInterval { interval: Duration },

    /// Exit the probe loop after any in-flight probe completes
    Shutdown,
}
