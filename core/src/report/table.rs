use ntlbox_common::network::host::HostProfile;

const GAP: &str = "  ";
const ELLIPSIS: char = '…';

/// Column titles and their fixed widths.
const COLUMNS: [(&str, usize); 6] = [
    ("IP", 15),
    ("STATUS", 6),
    ("HOSTNAME", 24),
    ("MAC", 17),
    ("VENDOR", 16),
    ("OS GUESS", 26),
];

/// Renders profiles as a fixed-width table: header, rule, one line per host.
///
/// The rule is exactly as long as the header. Cells wider than their column
/// are cut and end with `…`.
pub fn render_table<'a, I>(profiles: I) -> String
where
    I: IntoIterator<Item = &'a HostProfile>,
{
    let header = format_row(COLUMNS.map(|(title, _)| title));
    let rule = "-".repeat(header.chars().count());

    let mut lines = vec![header, rule];
    for profile in profiles {
        let address = profile.address.to_string();
        lines.push(format_row([
            &address,
            profile.status.as_str(),
            profile.hostname.as_str(),
            profile.mac_or_unknown(),
            profile.vendor(),
            profile.os_guess().as_str(),
        ]));
    }
    lines.join("\n")
}

fn format_row(cells: [&str; 6]) -> String {
    cells
        .iter()
        .zip(COLUMNS)
        .map(|(cell, (_, width))| format!("{:<width$}", truncate(cell, width)))
        .collect::<Vec<String>>()
        .join(GAP)
        .trim_end()
        .to_string()
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut cut: String = cell.chars().take(width.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    cut
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
