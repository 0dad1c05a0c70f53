//! The **capability boundary** between the scanner and the host operating system.
//!
//! The scanner only ever talks to the three traits below. The system
//! implementations shell out to `ping`, `arp` or `ip` and scrape their text
//! output, which differs per [`Platform`] and changes between tool versions.
//! Their parsers therefore fail soft: unexpected output becomes a missing
//! value, never an error.
//!
//! [`Platform`]: ntlbox_common::network::platform::Platform

use std::io;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use ntlbox_common::DiscoveryError;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

mod dns;
mod neighbor;
mod ping;

pub use dns::SystemResolver;
pub use neighbor::{SystemNeighbors, parse_mac};
pub use ping::{SystemPing, parse_ttl};

/// Address probed by preflight checks.
const PREFLIGHT_ADDR: Ipv4Addr = Ipv4Addr::LOCALHOST;
const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of one echo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeOutcome {
    pub reachable: bool,
    pub ttl: Option<u32>,
}

impl ProbeOutcome {
    pub fn unreachable() -> Self {
        Self::default()
    }
}

/// Reachability test for a single address.
#[async_trait]
pub trait HostProbe: Send + Sync {
    /// Checks once, before any host is probed, that the probe can run at all.
    async fn preflight(&self) -> Result<(), DiscoveryError> {
        Ok(())
    }

    /// Sends exactly one echo request. Transport failures count as unreachable.
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome;
}

/// Link-layer address lookup through the local neighbour (ARP) table.
#[async_trait]
pub trait NeighborResolver: Send + Sync {
    async fn preflight(&self) -> Result<(), DiscoveryError> {
        Ok(())
    }

    /// Returns the normalised MAC of `addr`, or `None` when there is no entry.
    async fn resolve_mac(&self, addr: Ipv4Addr) -> Option<String>;
}

/// Reverse DNS.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Returns the PTR name of `addr`, or `None` on timeout or any failure.
    async fn resolve_hostname(&self, addr: Ipv4Addr) -> Option<String>;
}

pub(crate) struct ToolOutput {
    pub success: bool,
    pub stdout: String,
}

/// Runs an external tool to completion, bounded by `limit`.
///
/// The child is killed if the deadline passes first.
pub(crate) async fn run_tool(
    tool: &'static str,
    args: &[String],
    limit: Duration,
) -> Result<ToolOutput, DiscoveryError> {
    let child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| spawn_error(tool, e))?;

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        }),
        Ok(Err(e)) => Err(DiscoveryError::Io(e)),
        Err(_) => Err(DiscoveryError::ProbeTimeout {
            tool,
            timeout: limit,
        }),
    }
}

fn spawn_error(tool: &'static str, e: io::Error) -> DiscoveryError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            DiscoveryError::ExternalToolUnavailable {
                tool,
                reason: e.to_string(),
            }
        }
        _ => DiscoveryError::Io(e),
    }
}

/// Runs `tool` once against the loopback address.
///
/// A tool that cannot be started, or that starts and exits with a failure,
/// makes the tool unusable for the whole scan. A preflight that only runs out
/// of time is inconclusive and lets the scan go ahead.
pub(crate) async fn preflight_tool(tool: &'static str, args: &[String]) -> Result<(), DiscoveryError> {
    match run_tool(tool, args, PREFLIGHT_TIMEOUT).await {
        Ok(output) if output.success => Ok(()),
        Ok(_) => Err(DiscoveryError::ExternalToolUnavailable {
            tool,
            reason: format!("{tool} failed against {PREFLIGHT_ADDR}"),
        }),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            debug!("preflight of '{tool}' inconclusive: {e}");
            Ok(())
        }
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
