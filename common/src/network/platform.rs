/// Family of the operating system the scanner runs on.
///
/// The external tools (ping, arp, ip) differ in flags and output per family,
/// so every text boundary is keyed on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    /// macOS and the BSDs.
    Bsd,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(any(
            target_os = "macos",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd"
        )) {
            Platform::Bsd
        } else {
            Platform::Linux
        }
    }

    /// Separator between MAC octets in this platform's neighbour table output.
    pub fn mac_separator(&self) -> char {
        match self {
            Platform::Windows => '-',
            Platform::Linux | Platform::Bsd => ':',
        }
    }
}
