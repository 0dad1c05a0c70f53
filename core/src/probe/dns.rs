use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ntlbox_common::DiscoveryError;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::debug;

use super::NameResolver;

/// Blocking lookups allowed to run at the same time.
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Reverse DNS through the system resolver, bounded by a timeout.
///
/// The lookup itself is blocking, so it runs on tokio's blocking pool. A
/// lookup that outlives the timeout is abandoned, not cancelled, and keeps
/// its permit until the resolver gives up. At most
/// `MAX_CONCURRENT_LOOKUPS` such lookups exist at once; callers beyond that
/// wait for a permit inside their own timeout.
pub struct SystemResolver {
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self::with_limit(timeout, MAX_CONCURRENT_LOOKUPS)
    }

    fn with_limit(timeout: Duration, max_lookups: usize) -> Self {
        Self {
            timeout,
            permits: Arc::new(Semaphore::new(max_lookups.max(1))),
        }
    }

    async fn lookup(&self, addr: Ipv4Addr) -> Result<String, DiscoveryError> {
        self.lookup_with(addr, dns_lookup::lookup_addr).await
    }

    async fn lookup_with<F>(&self, addr: Ipv4Addr, resolve: F) -> Result<String, DiscoveryError>
    where
        F: FnOnce(&IpAddr) -> io::Result<String> + Send + 'static,
    {
        let failure = |reason: String| DiscoveryError::ResolutionFailure { addr, reason };

        let ip = IpAddr::V4(addr);
        let permits = self.permits.clone();
        let task = async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|e| io::Error::other(e.to_string()))?;
            tokio::task::spawn_blocking(move || {
                let answer = resolve(&ip);
                drop(permit);
                answer
            })
            .await
            .map_err(|e| io::Error::other(e.to_string()))?
        };

        let name = match timeout(self.timeout, task).await {
            Err(_) => {
                return Err(failure(format!(
                    "no answer within {}ms",
                    self.timeout.as_millis()
                )));
            }
            Ok(Err(e)) => return Err(failure(e.to_string())),
            Ok(Ok(name)) => name,
        };

        clean_hostname(&name, addr).ok_or_else(|| failure("no PTR record".to_string()))
    }
}

#[async_trait]
impl NameResolver for SystemResolver {
    async fn resolve_hostname(&self, addr: Ipv4Addr) -> Option<String> {
        match self.lookup(addr).await {
            Ok(name) => Some(name),
            Err(e) => {
                debug!("{e}");
                None
            }
        }
    }
}

/// Drops the trailing root dot; an answer that is just the address is no name.
fn clean_hostname(name: &str, addr: Ipv4Addr) -> Option<String> {
    let name = name.trim().trim_end_matches('.');
    if name.is_empty() || name == addr.to_string() {
        None
    } else {
        Some(name.to_string())
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;
    use tokio::task::JoinSet;

    #[test]
    fn test_clean_hostname() {
        let addr = Ipv4Addr::new(192, 168, 1, 10);
        assert_eq!(clean_hostname("nas.lan.", addr).as_deref(), Some("nas.lan"));
        assert_eq!(clean_hostname("printer", addr).as_deref(), Some("printer"));
        assert_eq!(clean_hostname("192.168.1.10", addr), None);
        assert_eq!(clean_hostname("", addr), None);
    }

    #[tokio::test]
    async fn test_answer_is_cleaned() {
        let resolver = SystemResolver::new(Duration::from_secs(1));
        let addr = Ipv4Addr::new(10, 0, 0, 2);
        let name = resolver
            .lookup_with(addr, |_| Ok("gateway.lan.".to_string()))
            .await
            .unwrap();
        assert_eq!(name, "gateway.lan");

        let err = resolver
            .lookup_with(addr, |_| Ok("10.0.0.2".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::ResolutionFailure { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_lookups_are_bounded() {
        let resolver = Arc::new(SystemResolver::with_limit(Duration::from_millis(50), 2));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = JoinSet::new();
        for last in 1..=8u8 {
            let resolver = resolver.clone();
            let running = running.clone();
            let peak = peak.clone();
            tasks.spawn(async move {
                resolver
                    .lookup_with(Ipv4Addr::new(10, 0, 0, last), move |_| {
                        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(200));
                        running.fetch_sub(1, Ordering::SeqCst);
                        Ok("slow.lan".to_string())
                    })
                    .await
            });
        }

        let started = Instant::now();
        while let Some(joined) = tasks.join_next().await {
            assert!(joined.unwrap().is_err());
        }
        assert!(started.elapsed() < Duration::from_millis(200));
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    #[ignore]
    async fn test_resolves_loopback() {
        let resolver = SystemResolver::new(Duration::from_secs(2));
        let name = resolver.resolve_hostname(Ipv4Addr::LOCALHOST).await;
        assert!(name.is_some());
    }
}
