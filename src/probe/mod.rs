//! Probe transport abstraction
//!
//! The monitor core only knows the [`Prober`] capability: send one echo
//! request to an address, get back a [`ProbeOutcome`]. The production
//! implementation ([`icmp::IcmpProber`]) speaks ICMP; tests substitute
//! scripted probers.

use std::net::IpAddr;

use async_trait::async_trait;

use crate::ProbeOutcome;

pub mod icmp;

pub use icmp::IcmpProber;

/// Capability to probe a single host once
#[async_trait]
pub trait Prober: Send + Sync {
    /// Send one echo request to `address` and wait (bounded) for the reply.
    async fn probe(&self, address: &str) -> ProbeOutcome;
}

/// Resolve `host` to an IP address.
///
/// Plain IP literals resolve without a lookup; everything else goes through
/// the resolver.
pub async fn resolve_host(host: &str) -> Result<IpAddr, std::io::Error> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs = tokio::net::lookup_host(format!("{host}:0")).await?;
    addrs
        .into_iter()
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"))
}
