use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use ntlbox_common::network::platform::Platform;
use ntlbox_common::{DiscoveryError, ScanConfig};
use tracing::debug;

use super::{HostProbe, PREFLIGHT_ADDR, ProbeOutcome, preflight_tool, run_tool};

const PING: &str = "ping";

/// Extra time granted to the ping process on top of its own reply timeout.
const PROCESS_GRACE: Duration = Duration::from_secs(1);

/// ICMP echo through the system `ping` utility.
pub struct SystemPing {
    tool: &'static str,
    platform: Platform,
    wait_arg: String,
    limit: Duration,
}

impl SystemPing {
    pub fn new(cfg: &ScanConfig, platform: Platform) -> Self {
        Self {
            tool: PING,
            platform,
            wait_arg: cfg.ping_wait_arg(platform),
            limit: cfg.ping_timeout + PROCESS_GRACE,
        }
    }

    fn args(&self, addr: Ipv4Addr) -> Vec<String> {
        let (count_flag, wait_flag) = match self.platform {
            Platform::Windows => ("-n", "-w"),
            Platform::Linux => ("-c", "-W"),
            Platform::Bsd => ("-c", "-t"),
        };
        vec![
            count_flag.to_string(),
            "1".to_string(),
            wait_flag.to_string(),
            self.wait_arg.clone(),
            addr.to_string(),
        ]
    }
}

#[async_trait]
impl HostProbe for SystemPing {
    async fn preflight(&self) -> Result<(), DiscoveryError> {
        preflight_tool(self.tool, &self.args(PREFLIGHT_ADDR)).await
    }

    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        match run_tool(self.tool, &self.args(addr), self.limit).await {
            Ok(output) => ProbeOutcome {
                reachable: output.success,
                ttl: parse_ttl(&output.stdout),
            },
            Err(e) => {
                debug!("ping {addr}: {e}");
                ProbeOutcome::unreachable()
            }
        }
    }
}

/// Finds the TTL in ping output.
///
/// Looks for a case-insensitive `ttl` marker followed by an integer, with an
/// optional `=` or `:` in between (`TTL=128`, `ttl=64`, `ttl 64`). Markers not
/// followed by a number, such as "TTL expired in transit", are skipped.
pub fn parse_ttl(text: &str) -> Option<u32> {
    let lower = text.to_ascii_lowercase();
    lower.match_indices("ttl").find_map(|(idx, marker)| {
        let rest = lower[idx + marker.len()..].trim_start_matches([' ', '=', ':']);
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        rest[..end].parse().ok()
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
