//! Durable storage for the monitor
//!
//! Two independent concerns live here:
//!
//! - **Registry records** (`registry_file`): the `address,label` file that
//!   survives restarts. Rewritten in full on every mutation.
//! - **Probe logs** (`log_sink`): append-only per-host, per-day text
//!   streams behind the `LogSink` trait, so tests can swap in an in-memory
//!   sink (`memory`).

pub mod error;
pub mod log_sink;
pub mod memory;
pub mod registry_file;

pub use error::{StorageError, StorageResult};
pub use log_sink::{FileLogSink, LogSink};
pub use memory::MemoryLogSink;
