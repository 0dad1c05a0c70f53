//! Presentation of a finished scan.
//!
//! [`ScanReport`] keeps every probed address. The table only shows what the
//! operator asked for (live hosts, or everything with down hosts enabled);
//! the CSV and JSON exports always carry the full set.

use std::time::Duration;

use ntlbox_common::network::host::HostProfile;

mod export;
mod table;

pub use export::{HostRecord, parse_csv, render_csv, render_json};
pub use table::render_table;

#[derive(Debug, Clone)]
pub struct ScanReport {
    /// One profile per probed address, ascending by address.
    pub profiles: Vec<HostProfile>,
    pub show_down_hosts: bool,
    /// The scan was stopped before every candidate was dispatched.
    pub aborted: bool,
    pub elapsed: Duration,
}

impl ScanReport {
    /// Profiles that belong in the printed table.
    pub fn displayed(&self) -> impl Iterator<Item = &HostProfile> {
        self.profiles
            .iter()
            .filter(|profile| self.show_down_hosts || profile.is_up())
    }

    pub fn up_count(&self) -> usize {
        self.profiles.iter().filter(|p| p.is_up()).count()
    }

    pub fn down_count(&self) -> usize {
        self.len() - self.up_count()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn table(&self) -> String {
        render_table(self.displayed())
    }
}
