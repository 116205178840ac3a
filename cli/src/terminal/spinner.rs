use colored::*;
use indicatif::ProgressStyle;
use sdstatus_core::progress::{LogProgress, ProbeUpdate, ProgressSink};
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

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

fn scan_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Shows probe progress on the progress bar of a span.
///
/// The bar counts finished probes; its message is the latest update.
/// Updates are also logged at debug level.
pub struct SpanProgress {
    span: Span,
}

impl SpanProgress {
    pub fn new(span: Span, total: usize) -> Self {
        span.pb_set_style(&scan_style());
        span.pb_set_length(total as u64);
        span.pb_set_message(&format!("Checking {} sites...", total.to_string().green().bold()));
        Self { span }
    }
}

impl ProgressSink for SpanProgress {
    fn report(&self, update: &ProbeUpdate) {
        LogProgress.report(update);
        if update.is_finished() {
            self.span.pb_inc(1);
        }
        self.span.pb_set_message(&update.to_string());
    }
}
