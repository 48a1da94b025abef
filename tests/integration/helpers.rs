//! Test helpers and utilities for integration tests

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use pingmon::probe::Prober;
use pingmon::storage::{LogSink, MemoryLogSink, StorageError, StorageResult};
use pingmon::{HostRegistry, Monitor, ProbeOutcome};

/// Short probe interval so lifecycle tests converge quickly
pub const TEST_INTERVAL: Duration = Duration::from_millis(20);

/// Prober that replays a fixed outcome and counts its probes
pub struct ScriptedProber {
    outcome: ProbeOutcome,
    delay: Duration,
    probes: AtomicUsize,
}

impl ScriptedProber {
    pub fn success_ms(ms: f64) -> Arc<Self> {
        Arc::new(Self {
            outcome: ProbeOutcome::Success {
                latency: Duration::from_secs_f64(ms / 1000.0),
            },
            delay: Duration::ZERO,
            probes: AtomicUsize::new(0),
        })
    }

    pub fn timing_out() -> Arc<Self> {
        Arc::new(Self {
            outcome: ProbeOutcome::Timeout,
            delay: Duration::ZERO,
            probes: AtomicUsize::new(0),
        })
    }

    /// Prober whose probe call itself takes `delay`, for tests that need a
    /// probe to be in flight during control operations.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcome: ProbeOutcome::Success {
                latency: Duration::from_millis(1),
            },
            delay,
            probes: AtomicUsize::new(0),
        })
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, _address: &str) -> ProbeOutcome {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}

/// Log sink that always reports storage as unavailable
pub struct FailingSink;

#[async_trait]
impl LogSink for FailingSink {
    async fn append(
        &self,
        _address: &str,
        _timestamp: DateTime<Local>,
        _line: &str,
    ) -> StorageResult<()> {
        Err(StorageError::Unavailable("simulated outage".to_string()))
    }
}

/// Fully wired monitor over temp storage, with every part inspectable
pub struct TestMonitor {
    pub monitor: Monitor,
    pub sink: Arc<MemoryLogSink>,
    pub registry_path: PathBuf,
    _dir: tempfile::TempDir,
}

pub fn make_monitor(prober: Arc<ScriptedProber>) -> TestMonitor {
    let dir = tempfile::tempdir().unwrap();
    let registry_path = dir.path().join("ips.txt");

    let registry = Arc::new(HostRegistry::load(&registry_path));
    let sink = Arc::new(MemoryLogSink::new());

    let monitor = Monitor::new(registry, prober, sink.clone(), TEST_INTERVAL);

    TestMonitor {
        monitor,
        sink,
        registry_path,
        _dir: dir,
    }
}

/// Poll `condition` until it holds or two seconds pass.
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: AsyncFnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
