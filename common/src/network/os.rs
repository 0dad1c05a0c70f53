//! # TTL based OS guess
//!
//! Operating systems start their IP packets with different default TTLs
//! (255 for most network gear, 128 for Windows, 64 for Linux and Unix, 32
//! for some embedded network stacks). The TTL seen in an echo reply is that
//! default minus the hops travelled, so the band it falls in hints at the
//! sender's OS family.
//!
//! **This is a heuristic, not ground truth.** Administrators change default
//! TTLs, routers in between lower them, and many devices share one value.
//! Consumers should present the result as a guess.

use std::fmt;
use std::str::FromStr;

/// Coarse operating-system family guessed from a TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// TTL 200 and above.
    NetworkEquipment,
    /// TTL 120 to 199.
    Windows,
    /// TTL 60 to 119.
    LinuxUnix,
    /// TTL 30 to 59.
    NetworkOs,
    /// No TTL, or a TTL below 30.
    Unknown,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::NetworkEquipment => "network equipment (likely)",
            OsFamily::Windows => "Windows",
            OsFamily::LinuxUnix => "Linux/Unix",
            OsFamily::NetworkOs => "network OS",
            OsFamily::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            OsFamily::NetworkEquipment,
            OsFamily::Windows,
            OsFamily::LinuxUnix,
            OsFamily::NetworkOs,
            OsFamily::Unknown,
        ]
        .into_iter()
        .find(|family| family.as_str() == s)
        .ok_or_else(|| format!("unknown OS family: {s}"))
    }
}

/// Guesses the OS family from an observed TTL. Total over every input.
pub fn infer_os(ttl: Option<u32>) -> OsFamily {
    match ttl {
        None => OsFamily::Unknown,
        Some(200..) => OsFamily::NetworkEquipment,
        Some(120..=199) => OsFamily::Windows,
        Some(60..=119) => OsFamily::LinuxUnix,
        Some(30..=59) => OsFamily::NetworkOs,
        Some(_) => OsFamily::Unknown,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_defaults() {
        assert_eq!(infer_os(Some(64)).as_str(), "Linux/Unix");
        assert_eq!(infer_os(Some(128)).as_str(), "Windows");
        assert_eq!(infer_os(Some(255)).as_str(), "network equipment (likely)");
        assert_eq!(infer_os(None).as_str(), "unknown");
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(infer_os(Some(200)), OsFamily::NetworkEquipment);
        assert_eq!(infer_os(Some(199)), OsFamily::Windows);
        assert_eq!(infer_os(Some(120)), OsFamily::Windows);
        assert_eq!(infer_os(Some(119)), OsFamily::LinuxUnix);
        assert_eq!(infer_os(Some(60)), OsFamily::LinuxUnix);
        assert_eq!(infer_os(Some(59)), OsFamily::NetworkOs);
        assert_eq!(infer_os(Some(30)), OsFamily::NetworkOs);
        assert_eq!(infer_os(Some(29)), OsFamily::Unknown);
        assert_eq!(infer_os(Some(0)), OsFamily::Unknown);
        assert_eq!(infer_os(Some(u32::MAX)), OsFamily::NetworkEquipment);
    }

    #[test]
    fn test_bands_cover_every_ttl_in_order() {
        let rank = |family: OsFamily| match family {
            OsFamily::Unknown => 0,
            OsFamily::NetworkOs => 1,
            OsFamily::LinuxUnix => 2,
            OsFamily::Windows => 3,
            OsFamily::NetworkEquipment => 4,
        };
        let mut previous = rank(infer_os(Some(0)));
        for ttl in 1..=300u32 {
            let current = rank(infer_os(Some(ttl)));
            assert!(current >= previous, "bands must not overlap at ttl {ttl}");
            previous = current;
        }
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for ttl in [None, Some(10), Some(40), Some(64), Some(128), Some(250)] {
            let family = infer_os(ttl);
            assert_eq!(family.to_string().parse::<OsFamily>(), Ok(family));
        }
        assert!("BeOS".parse::<OsFamily>().is_err());
    }
}
