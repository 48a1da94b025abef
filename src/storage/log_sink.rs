//! Durable per-host probe logs
//!
//! Each host gets one append-only log stream per calendar day, addressed as
//! `<root>/<YYYY-MM-DD>/<address>_log.txt`. Streams for different hosts are
//! independent files, so concurrent appends never contend across hosts;
//! within one host the single probe loop is the only writer, which keeps
//! lines in probe order.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;

use super::error::StorageResult;

/// Sink for timestamped probe result lines
///
/// Implementations must be `Send + Sync`; every probe task holds a shared
/// reference and appends from its own loop.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Append one line to the log stream for `address` on the calendar day
    /// of `timestamp`, creating the stream if it does not exist yet.
    async fn append(
        &self,
        address: &str,
        timestamp: DateTime<Local>,
        line: &str,
    ) -> StorageResult<()>;
}

/// Log sink backed by dated directories of plain text files
pub struct FileLogSink {
    root: PathBuf,
}

impl FileLogSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn stream_path(&self, address: &str, timestamp: DateTime<Local>) -> PathBuf {
        self.root
            .join(timestamp.format("%Y-%m-%d").to_string())
            .join(format!("{address}_log.txt"))
    }
}

#[async_trait]
impl LogSink for FileLogSink {
    async fn append(
        &self,
        address: &str,
        timestamp: DateTime<Local>,
        line: &str,
    ) -> StorageResult<()> {
        let path = self.stream_path(address, timestamp);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await?;

        file.write_all(format!("{line}\n").as_bytes()).await?;
        Ok(())
    }
}
