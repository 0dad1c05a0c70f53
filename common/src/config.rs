use std::path::PathBuf;
use std::time::Duration;

use crate::network::platform::Platform;

/// Settings shared by every probe of one scan.
///
/// Built once by the caller and never changed while a scan is running.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// How long a single echo request may wait for its reply.
    pub ping_timeout: Duration,

    /// Upper bound for one reverse DNS lookup.
    pub dns_timeout: Duration,

    /// Prefix applied when the target carries none.
    pub default_prefix: u8,

    /// Keep unreachable hosts in the printed table.
    pub show_down_hosts: bool,

    /// Skips reverse DNS entirely. Hostnames are reported as "skipped".
    pub fast_mode: bool,

    /// Number of hosts probed at the same time.
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let ping_timeout = match Platform::current() {
            Platform::Windows => Duration::from_millis(120),
            Platform::Linux | Platform::Bsd => Duration::from_secs(1),
        };

        Self {
            ping_timeout,
            dns_timeout: Duration::from_millis(250),
            default_prefix: 24,
            show_down_hosts: false,
            fast_mode: false,
            workers: 32,
        }
    }
}

impl ScanConfig {
    /// Renders the ping timeout in the unit `platform`'s ping expects.
    ///
    /// Windows takes milliseconds. Everything else takes whole seconds, so the
    /// value is rounded up and never drops below one.
    pub fn ping_wait_arg(&self, platform: Platform) -> String {
        match platform {
            Platform::Windows => self.ping_timeout.as_millis().max(1).to_string(),
            Platform::Linux | Platform::Bsd => {
                let millis = self.ping_timeout.as_millis();
                millis.div_ceil(1000).max(1).to_string()
            }
        }
    }
}

/// Presentation settings of the command line; never read by the scanner.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// 0 prints everything, 1 hides headers, 2 also hides the host table.
    pub quiet: u8,

    /// Ask the operator for a prefix when the target has none.
    pub prompt: bool,

    /// Where to write the CSV export, if anywhere.
    pub csv: Option<PathBuf>,

    /// Where to write the JSON export, if anywhere.
    pub json: Option<PathBuf>,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
