//! Actor-based probing core
//!
//! Every monitored host runs as an independent async task communicating via
//! Tokio channels.
//!
//! ## Architecture Overview
//!
//! ```text
//!                  ┌─────────────────┐
//!                  │ ProbeSupervisor │◄── start/stop/reconcile/evict
//!                  └────────┬────────┘
//!                           │ owns one task per host
//!              ┌────────────┼────────────┐
//!              │            │            │
//!      ┌───────▼───────┐    │    ┌───────▼───────┐
//!      │ ProbeTask-1   │    │    │ ProbeTask-N   │
//!      │ (Host A)      │    │    │ (Host N)      │
//!      └───────┬───────┘    │    └───────┬───────┘
//!              │            │            │
//!              ├── append ──┼── append ──┤──► LogSink (per host, per day)
//!              │            │            │
//!              └────────────┼────────────┘
//!                           │ publish
//!                 ┌─────────▼──────────┐
//!                 │ Broadcast Channel  │ (MonitorEvent)
//!                 └─────────┬──────────┘
//!                           │ subscribe
//!                       Observers
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each probe task has an mpsc command channel for control
//!    messages (probe now, update interval, shutdown)
//! 2. **Events**: Tasks publish results to a broadcast channel for fan-out
//! 3. **Request/Response**: oneshot channels for synchronous queries

pub mod messages;
pub mod probe_task;
pub mod supervisor;

pub use messages::{MonitorEvent, ProbeEvent};
pub use probe_task::ProbeHandle;
pub use supervisor::ProbeSupervisor;
