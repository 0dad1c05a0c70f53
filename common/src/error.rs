use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while discovering hosts.
///
/// Only [`DiscoveryError::InvalidNetworkSpec`] and
/// [`DiscoveryError::ExternalToolUnavailable`] ever stop a scan. The per-host
/// variants are logged and turned into sentinel values by the scanner.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("invalid network: {0}")]
    InvalidNetworkSpec(String),

    #[error("{tool} gave no answer within {}ms", timeout.as_millis())]
    ProbeTimeout { tool: &'static str, timeout: Duration },

    #[error("could not resolve {addr}: {reason}")]
    ResolutionFailure { addr: Ipv4Addr, reason: String },

    #[error("'{tool}' cannot be used: {reason}")]
    ExternalToolUnavailable { tool: &'static str, reason: String },

    #[error("export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DiscoveryError {
    /// Whether the error must end the whole scan rather than a single host.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidNetworkSpec(_) | Self::ExternalToolUnavailable { .. }
        )
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
