//! ICMP echo prober
//!
//! One echo request per [`Prober::probe`] call, with the client picked per
//! IP version. A missing reply inside the timeout window is a `Timeout`
//! outcome; anything that prevents the probe from running at all maps to
//! `TransportError`.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::ProbeOutcome;

use super::{Prober, resolve_host};

/// Default per-probe timeout (3 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Prober speaking real ICMP via raw/datagram sockets
pub struct IcmpProber {
    timeout: Duration,
}

impl IcmpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        let ip_addr = match resolve_host(address).await {
            Ok(ip) => ip,
            Err(e) => {
                warn!(host = %address, error = %e, "failed to resolve host");
                return ProbeOutcome::TransportError(format!("resolution failed: {e}"));
            }
        };

        let client = match ip_addr {
            IpAddr::V4(_) => Client::new(&Config::default()),
            IpAddr::V6(_) => Client::new(&Config::builder().kind(ICMP::V6).build()),
        };

        let client = match client {
            Ok(c) => c,
            Err(e) => {
                warn!(host = %address, error = %e, "failed to create ICMP client");
                return ProbeOutcome::TransportError(format!("icmp client: {e}"));
            }
        };

        let mut pinger = client.pinger(ip_addr, PingIdentifier(rand::random())).await;
        pinger.timeout(self.timeout);

        match timeout(self.timeout, pinger.ping(PingSequence(0), &[])).await {
            Ok(Ok((_, rtt))) => {
                debug!(host = %address, latency_ms = rtt.as_secs_f64() * 1000.0, "echo reply");
                ProbeOutcome::Success { latency: rtt }
            }
            Ok(Err(surge_ping::SurgeError::Timeout { .. })) | Err(_) => {
                debug!(host = %address, timeout_ms = self.timeout.as_millis(), "no reply");
                ProbeOutcome::Timeout
            }
            Ok(Err(e)) => {
                warn!(host = %address, error = %e, "probe failed");
                ProbeOutcome::TransportError(e.to_string())
            }
        }
    }
}
