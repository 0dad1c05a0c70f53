use std::net::Ipv4Addr;

use chrono::Local;
use ntlbox_common::DiscoveryError;
use ntlbox_common::network::host::{HostProfile, HostStatus, Hostname};
use ntlbox_common::network::mac::UNKNOWN;
use serde::{Deserialize, Serialize};

use super::ScanReport;

/// One exported host, sentinels spelled out as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    pub address: String,
    pub status: String,
    pub hostname: String,
    pub mac_address: String,
    pub vendor: String,
    pub os_guess: String,
    pub time_to_live: Option<u32>,
}

impl From<&HostProfile> for HostRecord {
    fn from(profile: &HostProfile) -> Self {
        Self {
            address: profile.address.to_string(),
            status: profile.status.to_string(),
            hostname: profile.hostname.to_string(),
            mac_address: profile.mac_or_unknown().to_string(),
            vendor: profile.vendor().to_string(),
            os_guess: profile.os_guess().to_string(),
            time_to_live: profile.ttl,
        }
    }
}

/// Rebuilds a profile from an exported record.
///
/// Vendor and OS guess are not read back: they are derived again from the MAC
/// and TTL, which is where they came from in the first place.
impl TryFrom<HostRecord> for HostProfile {
    type Error = DiscoveryError;

    fn try_from(record: HostRecord) -> Result<Self, Self::Error> {
        let address: Ipv4Addr = record.address.parse().map_err(|_| {
            DiscoveryError::Export(format!("bad address in record: {}", record.address))
        })?;
        let status: HostStatus = record.status.parse().map_err(DiscoveryError::Export)?;
        let mac = (record.mac_address != UNKNOWN && !record.mac_address.is_empty())
            .then_some(record.mac_address);

        Ok(HostProfile::new(address, status)
            .with_hostname(Hostname::from(record.hostname.as_str()))
            .with_mac(mac)
            .with_ttl(record.time_to_live))
    }
}

fn export_err(e: impl std::fmt::Display) -> DiscoveryError {
    DiscoveryError::Export(e.to_string())
}

/// CSV with a header row; hostnames containing separators are quoted.
pub fn render_csv<'a, I>(profiles: I) -> Result<String, DiscoveryError>
where
    I: IntoIterator<Item = &'a HostProfile>,
{
    let mut writer = csv::Writer::from_writer(vec![]);
    for profile in profiles {
        writer.serialize(HostRecord::from(profile)).map_err(export_err)?;
    }
    let bytes = writer.into_inner().map_err(export_err)?;
    String::from_utf8(bytes).map_err(export_err)
}

pub fn parse_csv(text: &str) -> Result<Vec<HostRecord>, DiscoveryError> {
    csv::Reader::from_reader(text.as_bytes())
        .deserialize()
        .collect::<Result<Vec<HostRecord>, csv::Error>>()
        .map_err(export_err)
}

#[derive(Serialize)]
struct Envelope<'a> {
    timestamp: String,
    host: &'a str,
    status: &'static str,
    codes: Codes,
    summary: Summary,
    hosts: Vec<HostRecord>,
}

#[derive(Serialize)]
struct Codes {
    global: u8,
}

#[derive(Serialize)]
struct Summary {
    candidates: usize,
    up: usize,
    down: usize,
}

/// JSON report in the toolbox's shared `{timestamp, host, status, codes}`
/// envelope, with every probed host under `hosts`.
///
/// `host` names what was scanned (the CIDR block).
pub fn render_json(report: &ScanReport, host: &str) -> Result<String, DiscoveryError> {
    let (status, global) = if report.aborted {
        ("aborted", 1)
    } else {
        ("ok", 0)
    };

    let envelope = Envelope {
        timestamp: Local::now().to_rfc3339(),
        host,
        status,
        codes: Codes { global },
        summary: Summary {
            candidates: report.len(),
            up: report.up_count(),
            down: report.down_count(),
        },
        hosts: report.profiles.iter().map(HostRecord::from).collect(),
    };
    serde_json::to_string_pretty(&envelope).map_err(export_err)
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
    use std::time::Duration;

    fn sample() -> Vec<HostProfile> {
        vec![
            HostProfile::new(Ipv4Addr::new(10, 0, 0, 1), HostStatus::Up)
                .with_ttl(Some(255))
                .with_mac(Some("00:00:0c:01:02:03".to_string()))
                .with_hostname(Hostname::Resolved("core, switch".to_string())),
            HostProfile::new(Ipv4Addr::new(10, 0, 0, 2), HostStatus::Up)
                .with_ttl(Some(64))
                .with_hostname(Hostname::Skipped),
            HostProfile::new(Ipv4Addr::new(10, 0, 0, 3), HostStatus::Down),
        ]
    }

    #[test]
    fn test_csv_header_uses_export_field_names() {
        let csv = render_csv(&sample()).unwrap();
        assert_eq!(
            csv.lines().next(),
            Some("address,status,hostname,macAddress,vendor,osGuess,timeToLive")
        );
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_csv_quotes_hostnames_with_commas() {
        let csv = render_csv(&sample()).unwrap();
        assert!(csv.contains("\"core, switch\""));
    }

    #[test]
    fn test_csv_round_trip() {
        let profiles = sample();
        let csv = render_csv(&profiles).unwrap();
        let records = parse_csv(&csv).unwrap();

        let expected: Vec<HostRecord> = profiles.iter().map(HostRecord::from).collect();
        assert_eq!(records, expected);

        let rebuilt: Vec<HostProfile> = records
            .into_iter()
            .map(HostProfile::try_from)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rebuilt, profiles);
    }

    #[test]
    fn test_record_spells_out_sentinels() {
        let record = HostRecord::from(&sample()[2]);
        assert_eq!(record.status, "DOWN");
        assert_eq!(record.hostname, "unknown");
        assert_eq!(record.mac_address, "unknown");
        assert_eq!(record.vendor, "unknown");
        assert_eq!(record.os_guess, "unknown");
        assert_eq!(record.time_to_live, None);

        let skipped = HostRecord::from(&sample()[1]);
        assert_eq!(skipped.hostname, "skipped");
    }

    #[test]
    fn test_bad_record_is_rejected() {
        let mut record = HostRecord::from(&sample()[0]);
        record.address = "10.0.0".to_string();
        assert!(HostProfile::try_from(record).is_err());
    }

    #[test]
    fn test_json_envelope() {
        let report = ScanReport {
            profiles: sample(),
            show_down_hosts: false,
            aborted: false,
            elapsed: Duration::from_secs(1),
        };
        let json = render_json(&report, "10.0.0.0/29").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["host"], "10.0.0.0/29");
        assert_eq!(value["status"], "ok");
        assert_eq!(value["codes"]["global"], 0);
        assert_eq!(value["summary"]["up"], 2);
        assert_eq!(value["summary"]["down"], 1);
        assert_eq!(value["hosts"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["hosts"][0]["vendor"], "Cisco");
        assert_eq!(value["hosts"][0]["osGuess"], "network equipment (likely)");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_json_marks_aborted_scans() {
        let report = ScanReport {
            profiles: vec![],
            show_down_hosts: false,
            aborted: true,
            elapsed: Duration::ZERO,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&report, "10.0.0.0/24").unwrap()).unwrap();
        assert_eq!(value["status"], "aborted");
        assert_eq!(value["codes"]["global"], 1);
    }
}
