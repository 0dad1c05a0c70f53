use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::terminal::logging::ToolboxFormatter;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Installs the global subscriber.
///
/// Log lines go through the progress bar's writer so they never tear it.
/// `RUST_LOG` overrides the level picked from `verbose`.
pub fn init_logging(verbose: bool) {
    let indicatif_layer = IndicatifLayer::new();
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(ToolboxFormatter)
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.green/bright_black}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS)
        .progress_chars("━╸ ")
}

/// Span carrying the discovery progress bar, one tick per probed address.
pub fn discovery_span(candidates: u64) -> Span {
    let span = info_span!("discovery", indicatif.pb_show = true);
    span.pb_set_style(&progress_style());
    span.pb_set_length(candidates);
    span.pb_set_message("Probing hosts");
    span
}

pub fn report_discovery_progress(span: &Span, up: u64) {
    span.pb_inc(1);
    span.pb_set_message(&format!("{up} host(s) up so far"));
}
