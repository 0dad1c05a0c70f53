use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ntlbox_common::config::ScanConfig;
use ntlbox_core::Scanner;
use ntlbox_core::probe::{HostProbe, NameResolver, NeighborResolver, ProbeOutcome};

/// In-memory stand-in for ping: every address not listed in `down` answers.
pub struct FakeNetwork {
    down: HashSet<Ipv4Addr>,
    ttl: u32,
}

impl FakeNetwork {
    pub fn with_down_hosts<I>(down: I, ttl: u32) -> Self
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        Self {
            down: down.into_iter().collect(),
            ttl,
        }
    }
}

#[async_trait]
impl HostProbe for FakeNetwork {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        if self.down.contains(&addr) {
            ProbeOutcome::unreachable()
        } else {
            ProbeOutcome {
                reachable: true,
                ttl: Some(self.ttl),
            }
        }
    }
}

/// Neighbour table holding a Windows-style MAC for every address.
pub struct FakeNeighbors;

#[async_trait]
impl NeighborResolver for FakeNeighbors {
    async fn resolve_mac(&self, addr: Ipv4Addr) -> Option<String> {
        Some(format!("3c-5a-b4-00-00-{:02x}", addr.octets()[3]))
    }
}

/// Resolves `host-<last octet>.lan`, with a comma in the name of `.3`.
#[derive(Default)]
pub struct FakeNames {
    pub calls: AtomicUsize,
    asked: Mutex<Vec<Ipv4Addr>>,
}

impl FakeNames {
    pub fn asked(&self) -> Vec<Ipv4Addr> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NameResolver for FakeNames {
    async fn resolve_hostname(&self, addr: Ipv4Addr) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(addr);
        }
        match addr.octets()[3] {
            3 => Some("printer, floor 2".to_string()),
            last => Some(format!("host-{last}.lan")),
        }
    }
}

pub fn scanner(cfg: ScanConfig, network: FakeNetwork, names: Arc<FakeNames>) -> Scanner {
    Scanner::new(cfg, Arc::new(network), Arc::new(FakeNeighbors), names)
}

pub fn test_config() -> ScanConfig {
    ScanConfig {
        workers: 4,
        ..ScanConfig::default()
    }
}
