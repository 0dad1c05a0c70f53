use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use colored::*;
use tracing::Instrument;

use crate::commands::DiscoverArgs;
use crate::nprint;
use crate::terminal::{colors, format, print, prompt, spinner};
use ntlbox_common::config::{OutputConfig, ScanConfig};
use ntlbox_common::network::target::{NetworkTarget, TargetSpec};
use ntlbox_common::{success, warn};
use ntlbox_core::report::{render_csv, render_json};
use ntlbox_core::{ScanReport, Scanner};

pub async fn discover(args: DiscoverArgs, quiet: u8) -> anyhow::Result<()> {
    let cfg: ScanConfig = args.scan_config();
    let out: OutputConfig = args.output_config(quiet);

    let target: NetworkTarget = resolve_target(&args.target, &cfg, &out)?;
    if let Some(adjustment) = target.adjustment() {
        warn!("{adjustment}");
    }
    print_target(&target, &cfg, &out);

    let stop: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    watch_ctrl_c(stop.clone());

    let report: ScanReport = {
        let span = spinner::discovery_span(target.host_count());
        let progress_span = span.clone();
        let scanner = Scanner::system(cfg)
            .with_stop_signal(stop)
            .with_progress(move |progress| {
                spinner::report_discovery_progress(&progress_span, progress.up)
            });
        scanner.scan(&target).instrument(span).await?
    };

    discovery_ends(&report, &out);
    write_exports(&report, &target, &out)
}

fn resolve_target(
    raw: &str,
    cfg: &ScanConfig,
    out: &OutputConfig,
) -> anyhow::Result<NetworkTarget> {
    let spec: TargetSpec = TargetSpec::from_str(raw)?;
    let prefix: u8 = match spec.prefix {
        Some(prefix) => prefix,
        None if out.prompt => prompt::ask_prefix(cfg.default_prefix)?,
        None => cfg.default_prefix,
    };
    Ok(NetworkTarget::new(spec.addr, prefix)?)
}

fn print_target(target: &NetworkTarget, cfg: &ScanConfig, out: &OutputConfig) {
    if out.quiet > 0 {
        return;
    }
    print::aligned_line("Network", target.to_string().color(colors::IPV4_ADDR));
    print::aligned_line("Candidates", target.host_count().to_string());
    print::aligned_line("Workers", cfg.workers.to_string());
    print::aligned_line(
        "Ping timeout",
        format!("{} ms", cfg.ping_timeout.as_millis()),
    );
    let dns: String = if cfg.fast_mode {
        "skipped (fast mode)".to_string()
    } else {
        format!("{} ms", cfg.dns_timeout.as_millis())
    };
    print::aligned_line("Reverse DNS", dns);
}

/// Raises `stop` on the first Ctrl-C so no further host is dispatched.
fn watch_ctrl_c(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.store(true, Ordering::Relaxed);
            warn!("Interrupted, waiting for hosts already in flight");
        }
    });
}

fn discovery_ends(report: &ScanReport, out: &OutputConfig) {
    if report.displayed().next().is_none() {
        no_hosts_found(out);
    } else {
        print::header("Network Discovery", out.quiet);
        if out.quiet < 2 {
            for line in format::colored_table(report) {
                print::print(&line);
            }
        }
    }

    print_summary(report, out);
}

fn no_hosts_found(out: &OutputConfig) {
    print::header("zero hosts detected", out.quiet);
    if out.quiet == 0 {
        print::no_results();
    }
}

fn print_summary(report: &ScanReport, out: &OutputConfig) {
    let counts: String =
        format::status_summary(report.up_count(), report.down_count(), report.show_down_hosts);
    let output: String = format!(
        "{} / {} scanned in {}",
        counts,
        report.len().to_string().bold(),
        format!("{:.2}s", report.elapsed.as_secs_f64()).bold().yellow()
    );

    match out.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            nprint!();
            success!("{}", output)
        }
    }
}

fn write_exports(
    report: &ScanReport,
    target: &NetworkTarget,
    out: &OutputConfig,
) -> anyhow::Result<()> {
    if let Some(path) = &out.csv {
        let csv: String = render_csv(&report.profiles)?;
        write_file(path, &csv)?;
        success!("CSV report written to {}", path.display());
    }
    if let Some(path) = &out.json {
        let json: String = render_json(report, &target.to_string())?;
        write_file(path, &json)?;
        success!("JSON report written to {}", path.display());
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
