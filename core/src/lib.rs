//! # ntlbox core
//!
//! The discovery engine: probes every address of a [`NetworkTarget`] through
//! the platform's ping and neighbour-table tools, enriches live hosts with
//! reverse DNS, and renders the resulting inventory.
//!
//! * [`probe`]: capability traits and their system implementations.
//! * [`scanner`]: bounded-concurrency orchestration of the probes.
//! * [`report`]: table, CSV and JSON rendering of the results.
//!
//! [`NetworkTarget`]: ntlbox_common::network::target::NetworkTarget

pub mod probe;
pub mod report;
pub mod scanner;

pub use report::ScanReport;
pub use scanner::{ScanProgress, Scanner};
