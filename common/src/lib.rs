//! # ntlbox common
//!
//! Shared vocabulary of the discovery engine: the host model, the scan
//! configuration, the error taxonomy and the pure lookups (vendor, OS family)
//! that do not touch the network.

pub mod config;
pub mod error;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing;

pub use config::{OutputConfig, ScanConfig};
pub use error::DiscoveryError;
