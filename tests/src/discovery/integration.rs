use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use ntlbox_common::config::ScanConfig;
use ntlbox_common::network::host::{HostProfile, HostStatus, Hostname};
use ntlbox_common::network::range::Ipv4Range;
use ntlbox_common::network::target::{self, NetworkTarget};
use ntlbox_core::Scanner;
use ntlbox_core::report::{parse_csv, render_csv, render_json};

use crate::utils::{FakeNames, FakeNetwork, scanner, test_config};

fn ten_candidates() -> Ipv4Range {
    Ipv4Range::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 10))
}

fn three_down() -> FakeNetwork {
    FakeNetwork::with_down_hosts(
        [4, 7, 9].map(|last| Ipv4Addr::new(10, 0, 0, last)),
        128,
    )
}

/// Ten candidates with three unreachable: the table hides the three, the
/// export keeps all ten.
#[tokio::test]
async fn table_hides_down_hosts_but_export_keeps_them() {
    let names = Arc::new(FakeNames::default());
    let report = scanner(test_config(), three_down(), names)
        .scan_addresses(ten_candidates())
        .await
        .unwrap();

    assert_eq!(report.len(), 10);
    assert_eq!(report.up_count(), 7);
    assert_eq!(report.displayed().count(), 7);

    let table = report.table();
    let rows: Vec<&str> = table.lines().skip(2).collect();
    assert_eq!(rows.len(), 7);
    assert!(rows.iter().all(|row| row.contains("UP")));
    assert!(!table.contains("10.0.0.4 "));

    let csv = render_csv(&report.profiles).unwrap();
    let records = parse_csv(&csv).unwrap();
    assert_eq!(records.len(), 10);
    let down: Vec<&str> = records
        .iter()
        .filter(|r| r.status == "DOWN")
        .map(|r| r.address.as_str())
        .collect();
    assert_eq!(down, ["10.0.0.4", "10.0.0.7", "10.0.0.9"]);
}

#[tokio::test]
async fn csv_round_trip_restores_profiles() {
    let names = Arc::new(FakeNames::default());
    let report = scanner(test_config(), three_down(), names)
        .scan_addresses(ten_candidates())
        .await
        .unwrap();

    let csv = render_csv(&report.profiles).unwrap();
    let restored: Vec<HostProfile> = parse_csv(&csv)
        .unwrap()
        .into_iter()
        .map(HostProfile::try_from)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(restored, report.profiles);

    let printer = &restored[2];
    assert_eq!(printer.hostname, Hostname::Resolved("printer, floor 2".to_string()));
    assert_eq!(printer.mac.as_deref(), Some("3C:5A:B4:00:00:03"));
    assert_eq!(printer.vendor(), "Huawei");
    assert_eq!(printer.os_guess().as_str(), "Windows");

    let unreachable = &restored[3];
    assert_eq!(unreachable.status, HostStatus::Down);
    assert_eq!(unreachable.hostname, Hostname::Unknown);
    assert_eq!(unreachable.mac, None);
    assert_eq!(unreachable.ttl, None);
}

#[tokio::test]
async fn scanning_a_normalised_target_skips_network_and_broadcast() {
    let target: NetworkTarget = target::parse("192.168.7.37/28", 24).unwrap();
    let adjustment = target.adjustment().unwrap();
    assert!(adjustment.to_string().contains("192.168.7.32/28"));

    let names = Arc::new(FakeNames::default());
    let report = scanner(test_config(), FakeNetwork::with_down_hosts(std::iter::empty(), 64), names)
        .scan(&target)
        .await
        .unwrap();

    assert_eq!(report.len(), 14);
    assert_eq!(report.profiles[0].address, Ipv4Addr::new(192, 168, 7, 33));
    assert_eq!(report.profiles[13].address, Ipv4Addr::new(192, 168, 7, 46));
    assert!(report.profiles.iter().all(|p| p.os_guess().as_str() == "Linux/Unix"));
}

#[tokio::test]
async fn fast_mode_never_queries_dns() {
    let names = Arc::new(FakeNames::default());
    let cfg = ScanConfig {
        fast_mode: true,
        ..test_config()
    };
    let report = scanner(cfg, three_down(), names.clone())
        .scan_addresses(ten_candidates())
        .await
        .unwrap();

    assert_eq!(names.calls.load(Ordering::SeqCst), 0);
    assert!(names.asked().is_empty());
    assert!(
        report
            .displayed()
            .all(|p| p.hostname == Hostname::Skipped && p.mac.is_some())
    );
    assert!(report.table().contains("skipped"));
}

#[tokio::test]
async fn showing_down_hosts_lists_every_candidate() {
    let names = Arc::new(FakeNames::default());
    let cfg = ScanConfig {
        show_down_hosts: true,
        ..test_config()
    };
    let report = scanner(cfg, three_down(), names.clone())
        .scan_addresses(ten_candidates())
        .await
        .unwrap();

    assert_eq!(report.table().lines().skip(2).count(), 10);
    assert_eq!(names.asked().len(), 10);
}

#[tokio::test]
async fn json_envelope_carries_summary_and_hosts() {
    let names = Arc::new(FakeNames::default());
    let report = scanner(test_config(), three_down(), names)
        .scan_addresses(ten_candidates())
        .await
        .unwrap();

    let json = render_json(&report, "10.0.0.0/28").unwrap();
    assert!(json.contains("\"host\": \"10.0.0.0/28\""));
    assert!(json.contains("\"status\": \"ok\""));
    assert!(json.contains("\"global\": 0"));
    assert!(json.contains("\"candidates\": 10"));
    assert!(json.contains("\"up\": 7"));
    assert!(json.contains("\"down\": 3"));
    assert!(json.contains("\"macAddress\": \"3C:5A:B4:00:00:01\""));
}

/// Needs the system `ping`, `ip`/`arp` tools and a loopback interface.
#[tokio::test]
#[ignore]
async fn discovery_single_loopback() {
    let cfg = ScanConfig {
        fast_mode: true,
        ..ScanConfig::default()
    };
    let target = target::parse("127.0.0.1/32", 24).unwrap();

    let report = Scanner::system(cfg).scan(&target).await;

    assert!(report.is_ok(), "Discovery failed: {:?}", report.err());
    let report = report.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.profiles[0].address, Ipv4Addr::LOCALHOST);
    assert!(report.profiles[0].is_up());
}
