//! # Scan Target
//!
//! Turns what the operator typed into the IPv4 network that gets scanned.
//!
//! Accepted input is a single IPv4 address (`192.168.1.5`) or a CIDR block
//! (`192.168.1.0/24`). A bare address has no prefix yet; the caller either
//! asks the operator for one or applies the configured default through
//! [`TargetSpec::resolve`].
//!
//! The resulting [`NetworkTarget`] always sits on its canonical network
//! address. When the typed address had host bits set, [`NetworkTarget::adjustment`]
//! describes the correction so it can be shown instead of applied silently.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::DiscoveryError;
use crate::network::range::Ipv4Range;

/// Parsed but not yet resolved input: an address and maybe a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    pub addr: Ipv4Addr,
    pub prefix: Option<u8>,
}

impl FromStr for TargetSpec {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DiscoveryError::InvalidNetworkSpec(
                "no network given".to_string(),
            ));
        }

        let (addr_str, prefix) = match s.split_once('/') {
            Some((addr_str, prefix_str)) => (addr_str, Some(parse_prefix(prefix_str)?)),
            None => (s, None),
        };

        let addr = parse_ipv4(addr_str.trim())?;
        Ok(TargetSpec { addr, prefix })
    }
}

impl TargetSpec {
    /// Completes the spec into a network, using `default_prefix` when the
    /// input carried no prefix of its own.
    pub fn resolve(self, default_prefix: u8) -> Result<NetworkTarget, DiscoveryError> {
        let prefix = self.prefix.unwrap_or(default_prefix);
        NetworkTarget::new(self.addr, prefix)
    }
}

/// Parses a prefix length, accepting `0..=32` only.
pub fn parse_prefix(raw: &str) -> Result<u8, DiscoveryError> {
    let raw = raw.trim();
    let prefix: u8 = raw.parse().map_err(|_| {
        DiscoveryError::InvalidNetworkSpec(format!("'{raw}' is not a prefix length"))
    })?;

    if prefix > 32 {
        return Err(DiscoveryError::InvalidNetworkSpec(format!(
            "prefix {prefix} is outside 0-32"
        )));
    }
    Ok(prefix)
}

fn parse_ipv4(s: &str) -> Result<Ipv4Addr, DiscoveryError> {
    match s.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => Ok(addr),
        Ok(IpAddr::V6(addr)) => Err(DiscoveryError::InvalidNetworkSpec(format!(
            "{addr} is IPv6, only IPv4 networks can be scanned"
        ))),
        Err(_) => Err(DiscoveryError::InvalidNetworkSpec(format!(
            "'{s}' is not an IPv4 address"
        ))),
    }
}

/// Parses `raw` and resolves it with `default_prefix` in one step.
pub fn parse(raw: &str, default_prefix: u8) -> Result<NetworkTarget, DiscoveryError> {
    TargetSpec::from_str(raw)?.resolve(default_prefix)
}

/// A validated IPv4 block, normalised to its network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkTarget {
    network: Ipv4Network,
    requested: Ipv4Addr,
}

/// Correction applied when the typed address was not the network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub requested: Ipv4Addr,
    pub network: Ipv4Network,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} is not a network address, scanning {}/{} instead",
            self.requested,
            self.network.prefix(),
            self.network.network(),
            self.network.prefix()
        )
    }
}

impl NetworkTarget {
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, DiscoveryError> {
        let invalid = |e: pnet::ipnetwork::IpNetworkError| {
            DiscoveryError::InvalidNetworkSpec(format!("{addr}/{prefix}: {e}"))
        };
        let raw = Ipv4Network::new(addr, prefix).map_err(invalid)?;
        let network = Ipv4Network::new(raw.network(), prefix).map_err(invalid)?;

        Ok(Self {
            network,
            requested: addr,
        })
    }

    pub fn network_addr(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn adjustment(&self) -> Option<Adjustment> {
        (self.requested != self.network.network()).then_some(Adjustment {
            requested: self.requested,
            network: self.network,
        })
    }

    /// Addresses that get probed.
    ///
    /// Network and broadcast addresses are left out for prefixes up to /30.
    /// A /31 yields both of its addresses and a /32 its single address.
    pub fn host_range(&self) -> Ipv4Range {
        let start = self.network.network();
        let end = self.network.broadcast();

        if self.prefix() >= 31 {
            return Ipv4Range::new(start, end);
        }

        Ipv4Range::new(
            Ipv4Addr::from(u32::from(start) + 1),
            Ipv4Addr::from(u32::from(end) - 1),
        )
    }

    pub fn hosts(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Send + use<> {
        self.host_range().iter()
    }

    pub fn host_count(&self) -> u64 {
        self.host_range().len()
    }
}

impl fmt::Display for NetworkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_addr(), self.prefix())
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
