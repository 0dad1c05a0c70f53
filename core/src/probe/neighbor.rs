use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use ntlbox_common::DiscoveryError;
use ntlbox_common::network::mac;
use ntlbox_common::network::platform::Platform;
use tracing::debug;

use super::{NeighborResolver, preflight_tool, run_tool};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);
const NULL_MAC: &str = "00:00:00:00:00:00";

/// Neighbour-table lookup through `arp` (Windows, BSD) or `ip neigh` (Linux).
pub struct SystemNeighbors {
    platform: Platform,
}

impl SystemNeighbors {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    fn command(&self, addr: Ipv4Addr) -> (&'static str, Vec<String>) {
        let addr = addr.to_string();
        match self.platform {
            Platform::Windows => ("arp", vec!["-a".to_string(), addr]),
            Platform::Linux => ("ip", vec!["neigh".to_string(), "show".to_string(), addr]),
            Platform::Bsd => ("arp", vec!["-n".to_string(), addr]),
        }
    }

    /// Lists the whole table. A single-address query fails when the address
    /// has no entry, which loopback never has on Windows and BSD.
    fn preflight_command(&self) -> (&'static str, Vec<String>) {
        match self.platform {
            Platform::Windows => ("arp", vec!["-a".to_string()]),
            Platform::Linux => ("ip", vec!["neigh".to_string(), "show".to_string()]),
            Platform::Bsd => ("arp", vec!["-an".to_string()]),
        }
    }
}

#[async_trait]
impl NeighborResolver for SystemNeighbors {
    async fn preflight(&self) -> Result<(), DiscoveryError> {
        let (tool, args) = self.preflight_command();
        preflight_tool(tool, &args).await
    }

    async fn resolve_mac(&self, addr: Ipv4Addr) -> Option<String> {
        let (tool, args) = self.command(addr);
        match run_tool(tool, &args, LOOKUP_TIMEOUT).await {
            Ok(output) => parse_mac(&output.stdout, self.platform),
            Err(e) => {
                debug!("{tool} lookup of {addr}: {e}");
                None
            }
        }
    }
}

/// Picks the first MAC out of neighbour-table output.
///
/// The token must use the platform's separator and have six octets. The
/// all-zero address some systems print for incomplete entries is ignored.
pub fn parse_mac(text: &str, platform: Platform) -> Option<String> {
    let separator = platform.mac_separator();
    text.split_whitespace()
        .find(|token| mac::is_mac_token(token, separator))
        .map(mac::normalize_mac)
        .filter(|mac| mac != NULL_MAC)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
