//! The **orchestrator** of a discovery run.
//!
//! Every candidate address goes through the same pipeline: one echo request,
//! then (for live hosts, or all hosts when down hosts are shown) a neighbour
//! table lookup and a reverse DNS lookup side by side. Vendor and OS guess are
//! derived from the collected MAC and TTL afterwards.
//!
//! Hosts are evaluated concurrently, but never more than
//! [`ScanConfig::workers`] at once: a semaphore permit is taken before a host
//! task is spawned. Results are merged and sorted by address at the end, so
//! completion order never leaks into the report.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use ntlbox_common::network::host::{HostProfile, HostStatus, Hostname};
use ntlbox_common::network::platform::Platform;
use ntlbox_common::network::target::NetworkTarget;
use ntlbox_common::{DiscoveryError, ScanConfig, error, info, warn};
use tokio::sync::Semaphore;
use tokio::task::{self, JoinError, JoinSet};
use tracing::debug;

use crate::probe::{
    HostProbe, NameResolver, NeighborResolver, SystemNeighbors, SystemPing, SystemResolver,
};
use crate::report::ScanReport;

/// Snapshot handed to the progress callback after each finished host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub done: u64,
    pub up: u64,
}

type ProgressFn = Arc<dyn Fn(ScanProgress) + Send + Sync>;

pub struct Scanner {
    cfg: ScanConfig,
    probe: Arc<dyn HostProbe>,
    neighbors: Arc<dyn NeighborResolver>,
    names: Arc<dyn NameResolver>,
    on_progress: Option<ProgressFn>,
    stop: Arc<AtomicBool>,
}

/// What a single host task needs; cheap to clone.
#[derive(Clone)]
struct HostWorker {
    probe: Arc<dyn HostProbe>,
    neighbors: Arc<dyn NeighborResolver>,
    names: Arc<dyn NameResolver>,
    show_down_hosts: bool,
    fast_mode: bool,
}

impl Scanner {
    pub fn new(
        cfg: ScanConfig,
        probe: Arc<dyn HostProbe>,
        neighbors: Arc<dyn NeighborResolver>,
        names: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            cfg,
            probe,
            neighbors,
            names,
            on_progress: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A scanner backed by this machine's ping, neighbour table and resolver.
    pub fn system(cfg: ScanConfig) -> Self {
        let platform = Platform::current();
        let probe = Arc::new(SystemPing::new(&cfg, platform));
        let neighbors = Arc::new(SystemNeighbors::new(platform));
        let names = Arc::new(SystemResolver::new(cfg.dns_timeout));
        Self::new(cfg, probe, neighbors, names)
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ScanProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Once `stop` is raised no further host is dispatched. Hosts already in
    /// flight run until their own timeouts.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub async fn scan(&self, target: &NetworkTarget) -> Result<ScanReport, DiscoveryError> {
        info!(
            "Probing {} candidate address(es) in {target}",
            target.host_count()
        );
        self.scan_addresses(target.hosts()).await
    }

    /// Scans an arbitrary set of addresses with the same pipeline as [`Scanner::scan`].
    pub async fn scan_addresses<I>(&self, addrs: I) -> Result<ScanReport, DiscoveryError>
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        self.preflight().await?;

        let start_time = Instant::now();
        let permits = Arc::new(Semaphore::new(self.cfg.workers.max(1)));
        let done = Arc::new(AtomicU64::new(0));
        let up = Arc::new(AtomicU64::new(0));
        let worker = self.worker();

        let mut tasks: JoinSet<HostProfile> = JoinSet::new();
        let mut profiles: Vec<HostProfile> = Vec::new();
        let mut dispatched: HashMap<task::Id, Ipv4Addr> = HashMap::new();
        let mut aborted = false;

        for addr in addrs {
            if self.stop.load(Ordering::Relaxed) {
                aborted = true;
                break;
            }

            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };

            if self.stop.load(Ordering::Relaxed) {
                aborted = true;
                break;
            }

            let worker = worker.clone();
            let done = done.clone();
            let up = up.clone();
            let on_progress = self.on_progress.clone();

            let handle = tasks.spawn(async move {
                let profile = worker.evaluate(addr).await;
                drop(permit);

                let up_now = if profile.is_up() {
                    up.fetch_add(1, Ordering::Relaxed) + 1
                } else {
                    up.load(Ordering::Relaxed)
                };
                let done_now = done.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(callback) = on_progress {
                    callback(ScanProgress {
                        done: done_now,
                        up: up_now,
                    });
                }
                profile
            });
            dispatched.insert(handle.id(), addr);

            while let Some(joined) = tasks.try_join_next() {
                collect(joined, &dispatched, &mut profiles);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            collect(joined, &dispatched, &mut profiles);
        }

        profiles.sort_by_key(|profile| profile.address);

        if aborted {
            warn!(
                "Scan interrupted, {} address(es) were probed before stopping",
                profiles.len()
            );
        }

        let report = ScanReport {
            profiles,
            show_down_hosts: self.cfg.show_down_hosts,
            aborted,
            elapsed: start_time.elapsed(),
        };
        info!(
            "{} host(s) up, {} down out of {} probed",
            report.up_count(),
            report.down_count(),
            report.len()
        );
        Ok(report)
    }

    /// Fails the scan once, up front, when a required tool cannot run.
    async fn preflight(&self) -> Result<(), DiscoveryError> {
        self.probe.preflight().await?;
        self.neighbors.preflight().await?;
        Ok(())
    }

    fn worker(&self) -> HostWorker {
        HostWorker {
            probe: self.probe.clone(),
            neighbors: self.neighbors.clone(),
            names: self.names.clone(),
            show_down_hosts: self.cfg.show_down_hosts,
            fast_mode: self.cfg.fast_mode,
        }
    }
}

impl HostWorker {
    async fn evaluate(&self, addr: Ipv4Addr) -> HostProfile {
        // Ping goes first: the echo also fills the neighbour cache.
        let outcome = self.probe.probe(addr).await;
        let status = if outcome.reachable {
            HostStatus::Up
        } else {
            HostStatus::Down
        };
        let profile = HostProfile::new(addr, status).with_ttl(outcome.ttl);

        if !outcome.reachable {
            debug!("{addr} did not answer");
            if !self.show_down_hosts {
                return profile;
            }
        }

        let (mac, hostname) = tokio::join!(self.neighbors.resolve_mac(addr), self.hostname(addr));
        profile.with_mac(mac).with_hostname(hostname)
    }

    async fn hostname(&self, addr: Ipv4Addr) -> Hostname {
        if self.fast_mode {
            return Hostname::Skipped;
        }
        Hostname::from_lookup(self.names.resolve_hostname(addr).await)
    }
}

/// A host whose task died still gets a profile, reported as down.
fn collect(
    joined: Result<HostProfile, JoinError>,
    dispatched: &HashMap<task::Id, Ipv4Addr>,
    profiles: &mut Vec<HostProfile>,
) {
    match joined {
        Ok(profile) => profiles.push(profile),
        Err(e) => match dispatched.get(&e.id()) {
            Some(&addr) => {
                error!("evaluating {addr} failed: {e}");
                profiles.push(HostProfile::new(addr, HostStatus::Down));
            }
            None => error!("host task failed: {e}"),
        },
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
