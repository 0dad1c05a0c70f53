pub mod discover;

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use ntlbox_common::config::{OutputConfig, ScanConfig};

#[derive(Parser)]
#[command(name = "ntlbox")]
#[command(about = "Network discovery for the NTL system toolbox.", version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output: once hides headers, twice also hides the host table
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Debug logs, including every host that did not answer
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover hosts in a given network
    #[command(alias = "d")]
    Discover(DiscoverArgs),
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// IPv4 address or CIDR block, e.g. 192.168.1.0/24
    pub target: String,

    /// Prefix applied when TARGET has none
    #[arg(long, value_name = "N", default_value_t = 24, value_parser = clap::value_parser!(u8).range(0..=32))]
    pub default_prefix: u8,

    /// Skip reverse DNS, hostnames are reported as "skipped"
    #[arg(short, long)]
    pub fast: bool,

    /// List hosts that did not answer as well
    #[arg(long)]
    pub show_down: bool,

    /// Echo reply timeout [default: 120 on Windows, 1000 elsewhere]
    #[arg(long, value_name = "MS")]
    pub ping_timeout_ms: Option<u64>,

    /// Reverse DNS timeout
    #[arg(long, value_name = "MS", default_value_t = 250)]
    pub dns_timeout_ms: u64,

    /// Hosts probed at the same time
    #[arg(short, long, value_name = "N", default_value_t = 32, value_parser = RangedU64ValueParser::<usize>::new().range(1..=256))]
    pub workers: usize,

    /// Write every probed host to a CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Write every probed host to a JSON report
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Never ask for a prefix, apply --default-prefix instead
    #[arg(long)]
    pub no_prompt: bool,
}

impl DiscoverArgs {
    pub fn scan_config(&self) -> ScanConfig {
        let defaults = ScanConfig::default();
        ScanConfig {
            ping_timeout: self
                .ping_timeout_ms
                .map_or(defaults.ping_timeout, Duration::from_millis),
            dns_timeout: Duration::from_millis(self.dns_timeout_ms),
            default_prefix: self.default_prefix,
            show_down_hosts: self.show_down,
            fast_mode: self.fast,
            workers: self.workers,
        }
    }

    pub fn output_config(&self, quiet: u8) -> OutputConfig {
        OutputConfig {
            quiet,
            prompt: !self.no_prompt && console::user_attended(),
            csv: self.csv.clone(),
            json: self.json.clone(),
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
