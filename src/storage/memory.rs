//! In-memory log sink (no persistence)
//!
//! Collects appended lines in a map keyed by the stream path. Useful for
//! tests that need to inspect exactly what a probe loop logged without
//! touching the filesystem.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use super::error::StorageResult;
use super::log_sink::LogSink;

/// Log sink that keeps every appended line in memory
#[derive(Default)]
pub struct MemoryLogSink {
    streams: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines appended for `address`, across every day, in append order.
    pub fn lines_for(&self, address: &str) -> Vec<String> {
        let streams = self.streams.lock().expect("log sink lock poisoned");

        let suffix = format!("/{address}_log.txt");
        let mut keys: Vec<_> = streams.keys().filter(|k| k.ends_with(&suffix)).collect();
        keys.sort();

        keys.into_iter()
            .flat_map(|k| streams[k].iter().cloned())
            .collect()
    }

    /// Total number of lines appended across all streams.
    pub fn total_lines(&self) -> usize {
        let streams = self.streams.lock().expect("log sink lock poisoned");
        streams.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl LogSink for MemoryLogSink {
    async fn append(
        &self,
        address: &str,
        timestamp: DateTime<Local>,
        line: &str,
    ) -> StorageResult<()> {
        let key = format!("{}/{address}_log.txt", timestamp.format("%Y-%m-%d"));

        let mut streams = self.streams.lock().expect("log sink lock poisoned");
        streams.entry(key).or_default().push(line.to_string());
        Ok(())
    }
}
