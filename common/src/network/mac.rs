use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use pnet::util::MacAddr;

/// Sentinel for any lookup that produced nothing.
pub const UNKNOWN: &str = "unknown";

/// Length of `XX:XX:XX`, the OUI part of a normalised MAC.
const OUI_LEN: usize = 8;

/// Manufacturers known to the toolbox, keyed by OUI.
///
/// Extending coverage means adding rows here; the lookup itself never changes.
const OUI_TABLE: &[(&str, &str)] = &[
    ("00:00:0C", "Cisco"),
    ("00:1B:54", "Cisco"),
    ("00:0C:29", "VMware"),
    ("00:50:56", "VMware"),
    ("00:05:69", "VMware"),
    ("08:00:27", "VirtualBox"),
    ("52:54:00", "QEMU/KVM"),
    ("00:15:5D", "Microsoft Hyper-V"),
    ("00:1C:42", "Parallels"),
    ("00:16:3E", "Xen"),
    ("B8:27:EB", "Raspberry Pi"),
    ("DC:A6:32", "Raspberry Pi"),
    ("E4:5F:01", "Raspberry Pi"),
    ("3C:5A:B4", "Huawei"),
    ("00:E0:FC", "Huawei"),
    ("28:6E:D4", "Huawei"),
    ("00:1A:11", "Google"),
    ("F4:F5:D8", "Google"),
    ("00:17:F2", "Apple"),
    ("3C:22:FB", "Apple"),
    ("A4:83:E7", "Apple"),
    ("00:1A:A0", "Dell"),
    ("F8:BC:12", "Dell"),
    ("00:1B:78", "HP"),
    ("3C:D9:2B", "HP"),
    ("00:25:B3", "HP"),
    ("00:1B:21", "Intel"),
    ("3C:97:0E", "Intel"),
    ("F4:EC:38", "TP-Link"),
    ("50:C7:BF", "TP-Link"),
    ("00:27:22", "Ubiquiti"),
    ("24:A4:3C", "Ubiquiti"),
    ("00:0C:42", "MikroTik"),
    ("4C:5E:0C", "MikroTik"),
    ("00:09:0F", "Fortinet"),
    ("00:1B:17", "Palo Alto Networks"),
    ("00:11:32", "Synology"),
    ("00:08:9B", "QNAP"),
    ("00:1D:AA", "DrayTek"),
    ("00:24:D4", "Freebox"),
    ("00:07:CB", "Freebox"),
    ("00:1F:9F", "Thomson"),
    ("00:26:5A", "D-Link"),
    ("00:1E:58", "D-Link"),
    ("00:14:BF", "Linksys"),
    ("00:1E:C2", "Apple"),
    ("00:16:32", "Samsung"),
    ("8C:77:12", "Samsung"),
    ("00:1E:4F", "Dell"),
    ("00:21:5A", "HP"),
    ("00:80:77", "Brother"),
    ("00:00:48", "Epson"),
    ("00:00:85", "Canon"),
    ("00:26:73", "Ricoh"),
    ("00:04:F2", "Polycom"),
    ("00:0B:82", "Grandstream"),
];

fn oui_table() -> &'static HashMap<&'static str, &'static str> {
    static OUI_DB: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    OUI_DB.get_or_init(|| OUI_TABLE.iter().copied().collect())
}

/// Brings a MAC into the `XX:XX:XX:XX:XX:XX` form.
///
/// Upper-cases, turns `-` into `:` and zero-pads single-digit octets
/// (`0:1a:2b:3:4:5` as printed by BSD arp). Input that does not split into
/// six hex octets is returned upper-cased with its separators normalised,
/// never rejected.
pub fn normalize_mac(raw: &str) -> String {
    let cleaned = raw.trim().to_uppercase().replace('-', ":");

    match MacAddr::from_str(&cleaned) {
        Ok(mac) => mac.to_string().to_uppercase(),
        Err(_) => cleaned,
    }
}

/// Identifies the manufacturer of a MAC from its OUI.
///
/// Returns [`UNKNOWN`] when the MAC is too short to hold an OUI or the OUI is
/// not in the table.
pub fn vendor_of(mac: &str) -> &'static str {
    let mac = normalize_mac(mac);
    mac.get(..OUI_LEN)
        .and_then(|oui| oui_table().get(oui).copied())
        .unwrap_or(UNKNOWN)
}

/// Whether `token` looks like a MAC written with `separator`.
///
/// Six hex groups of one or two digits. Windows always prints two, so a
/// dash-separated token must also be exactly 17 characters long.
pub fn is_mac_token(token: &str, separator: char) -> bool {
    let groups: Vec<&str> = token.split(separator).collect();
    if groups.len() != 6 {
        return false;
    }
    if separator == '-' && token.len() != 17 {
        return false;
    }
    groups
        .iter()
        .all(|g| (1..=2).contains(&g.len()) && g.chars().all(|c| c.is_ascii_hexdigit()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
