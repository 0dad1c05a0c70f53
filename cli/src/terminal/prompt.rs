use anyhow::Context;
use colored::*;
use console::Term;
use ntlbox_common::DiscoveryError;
use ntlbox_common::network::target::parse_prefix;
use ntlbox_common::warn;

use crate::terminal::colors;

/// Asks for a prefix length until a valid one (0 to 32) is entered.
///
/// An empty answer keeps `default`.
pub fn ask_prefix(default: u8) -> anyhow::Result<u8> {
    let term = Term::stderr();
    loop {
        let question = format!(
            "{} No prefix given, prefix length to scan [{}]: ",
            "[?]".color(colors::ACCENT).bold(),
            default.to_string().color(colors::PRIMARY)
        );
        term.write_str(&question)
            .context("writing the prefix prompt")?;
        let answer = term.read_line().context("reading the prefix length")?;
        match prefix_from_answer(&answer, default) {
            Ok(prefix) => return Ok(prefix),
            Err(e) => warn!("{e}"),
        }
    }
}

/// Reads one answer to the prefix question. An error means ask again.
fn prefix_from_answer(answer: &str, default: u8) -> Result<u8, DiscoveryError> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(default);
    }
    parse_prefix(answer.trim_start_matches('/'))
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
    fn empty_answer_keeps_the_default() {
        assert_eq!(prefix_from_answer("", 24).unwrap(), 24);
        assert_eq!(prefix_from_answer("  \n", 16).unwrap(), 16);
    }

    #[test]
    fn slash_notation_is_accepted() {
        assert_eq!(prefix_from_answer("/24", 16).unwrap(), 24);
        assert_eq!(prefix_from_answer("28\n", 24).unwrap(), 28);
        assert_eq!(prefix_from_answer("0", 24).unwrap(), 0);
        assert_eq!(prefix_from_answer("32", 24).unwrap(), 32);
    }

    #[test]
    fn invalid_answers_ask_again() {
        for answer in ["33", "abc", "/", "-1", "24.5"] {
            let err = prefix_from_answer(answer, 24).unwrap_err();
            assert!(
                matches!(err, DiscoveryError::InvalidNetworkSpec(_)),
                "{answer} gave {err}"
            );
        }
    }
}
