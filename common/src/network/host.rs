use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::network::mac::{self, UNKNOWN};
use crate::network::os::{self, OsFamily};

/// Sentinel for a hostname that was deliberately not looked up.
pub const SKIPPED: &str = "skipped";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostStatus {
    Up,
    Down,
}

impl HostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostStatus::Up => "UP",
            HostStatus::Down => "DOWN",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "UP" => Ok(HostStatus::Up),
            "DOWN" => Ok(HostStatus::Down),
            _ => Err(format!("unknown host status: {s}")),
        }
    }
}

/// Outcome of the reverse DNS step for one host.
///
/// `Unknown` means a lookup ran and found nothing; `Skipped` means no lookup
/// was attempted (fast mode). Both must stay distinguishable in exports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Hostname {
    Resolved(String),
    #[default]
    Unknown,
    Skipped,
}

impl Hostname {
    pub fn as_str(&self) -> &str {
        match self {
            Hostname::Resolved(name) => name,
            Hostname::Unknown => UNKNOWN,
            Hostname::Skipped => SKIPPED,
        }
    }

    pub fn from_lookup(name: Option<String>) -> Self {
        name.map_or(Hostname::Unknown, Hostname::Resolved)
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Hostname {
    fn from(s: &str) -> Self {
        match s {
            "" | UNKNOWN => Hostname::Unknown,
            SKIPPED => Hostname::Skipped,
            name => Hostname::Resolved(name.to_string()),
        }
    }
}

/// Everything learnt about one scanned address.
///
/// Vendor and OS guess are not stored: they are derived from the MAC and the
/// TTL on every read, so they can never disagree with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    pub address: Ipv4Addr,
    pub status: HostStatus,
    pub hostname: Hostname,
    /// Normalised MAC, `None` when the neighbour table had no entry.
    pub mac: Option<String>,
    pub ttl: Option<u32>,
}

impl HostProfile {
    pub fn new(address: Ipv4Addr, status: HostStatus) -> Self {
        Self {
            address,
            status,
            hostname: Hostname::Unknown,
            mac: None,
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Option<u32>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_mac(mut self, mac: Option<String>) -> Self {
        self.mac = mac.map(|m| mac::normalize_mac(&m));
        self
    }

    pub fn with_hostname(mut self, hostname: Hostname) -> Self {
        self.hostname = hostname;
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == HostStatus::Up
    }

    pub fn mac_or_unknown(&self) -> &str {
        self.mac.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn vendor(&self) -> &'static str {
        self.mac.as_deref().map_or(UNKNOWN, mac::vendor_of)
    }

    pub fn os_guess(&self) -> OsFamily {
        os::infer_os(self.ttl)
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
