use colored::*;
use ntlbox_common::network::host::HostStatus;
use ntlbox_core::ScanReport;

use crate::terminal::colors;

/// Colors the rendered table line by line.
///
/// Padding is part of each line before coloring, so columns never shift.
pub fn colored_table(report: &ScanReport) -> Vec<String> {
    let table = report.table();
    let mut lines = table.lines();
    let mut out: Vec<String> = Vec::new();

    for heading in lines.by_ref().take(2) {
        out.push(heading.color(colors::PRIMARY).bold().to_string());
    }

    for (line, profile) in lines.zip(report.displayed()) {
        let colored: ColoredString = match profile.status {
            HostStatus::Up => line.color(colors::HOST_UP),
            HostStatus::Down => line.color(colors::HOST_DOWN).dimmed(),
        };
        out.push(colored.to_string());
    }
    out
}

pub fn status_summary(up: usize, down: usize, show_down: bool) -> String {
    let up: ColoredString = format!("{up} up").bold().color(colors::HOST_UP);
    if !show_down {
        return up.to_string();
    }
    let down: ColoredString = format!("{down} down").bold().color(colors::HOST_DOWN);
    format!("{up}, {down}")
}
