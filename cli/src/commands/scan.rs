use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use colored::*;
use tracing::{Instrument, info, info_span, warn};

use sdstatus_common::config::{Config, OutputMode};
use sdstatus_common::scan::{batch::ScanBatch, result::ScanResult, target::ScanTarget};
use sdstatus_core::network::{client::StatusClient, proxy};
use sdstatus_core::render;
use sdstatus_core::scanner::Scanner;
use sdstatus_core::targets::{self, TargetSet};

use super::ScanArgs;
use crate::terminal::{colors, print, spinner::SpanProgress};

pub async fn scan(args: ScanArgs) -> anyhow::Result<()> {
    ensure!(
        args.has_sources(),
        "Please supply sites to scan on the command line or with --directory or --input-file."
    );

    let cfg: Config = args.config();
    let client = proxy::build_client(&cfg.proxy, cfg.timeout)?;
    let targets: Vec<ScanTarget> = collect_targets(&args, &client).await?;

    let out: Box<dyn Write> = match &args.output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Could not open output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let span = info_span!("scan", indicatif.pb_show = true);
    let progress = SpanProgress::new(span.clone(), targets.len());
    let scanner = Scanner::new(client, cfg.timeout).with_progress(progress);

    let start_time: Instant = Instant::now();
    let stream = scanner.launch(targets).await?;
    let batch: ScanBatch = render::render(stream, cfg.mode, cfg.format, out)
        .instrument(span)
        .await
        .context("Could not write scan results")?;

    if cfg.mode == OutputMode::Streaming {
        info!("Streamed results are in arrival order, not sorted");
    }
    if let Some(path) = &args.output_file {
        info!("Wrote {} results to {}", cfg.format, path.display());
    }

    scan_ends(&batch, start_time.elapsed());
    Ok(())
}

/// Gathers targets from every source the user named, one per address.
///
/// Later sources override earlier ones: arguments, then the input file, then the directory.
async fn collect_targets<C>(args: &ScanArgs, client: &C) -> anyhow::Result<Vec<ScanTarget>>
where
    C: StatusClient + ?Sized,
{
    let mut set = TargetSet::new();

    for list in &args.onion_urls {
        for target in targets::parse_list(list)? {
            info!("Will scan {}", target.address());
            set.insert(target);
        }
    }

    if let Some(path) = &args.input_file {
        set.extend(targets::read_input_file(path)?);
    }

    if args.directory {
        // The directory is fetched through the proxy as well.
        client.ensure_ready().await?;
        let listed = targets::fetch_directory(client, &args.directory_url)
            .await
            .context("Could not read onion addresses from the SecureDrop directory")?;
        set.extend(listed);
    }

    if set.is_empty() {
        warn!("No sites to scan");
    } else {
        info!("Collected {} distinct sites", set.len());
    }
    Ok(set.into_targets())
}

fn scan_ends(batch: &ScanBatch, total_time: Duration) {
    if batch.is_empty() {
        print::header("zero sites scanned");
        print::no_results();
        return;
    }

    print::header("scan summary");
    let unavailable: Vec<&ScanResult> = batch
        .sorted()
        .into_iter()
        .filter(|r| !r.is_available())
        .collect();

    for (idx, result) in unavailable.iter().enumerate() {
        print_unavailable(result, idx);
    }

    let key_width: usize = "Unavailable".len();
    print::aligned_line("Scanned", key_width, batch.len());
    print::aligned_line(
        "Available",
        key_width,
        batch.available_count().to_string().color(colors::AVAILABLE),
    );
    print::aligned_line(
        "Unavailable",
        key_width,
        unavailable.len().to_string().color(colors::UNAVAILABLE),
    );

    let available: ColoredString = format!("{} of {} sites", batch.available_count(), batch.len())
        .bold()
        .green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    print::fat_separator();
    print::centerln(&format!("Scan Complete: {available} available in {total_time}"));
}

fn print_unavailable(result: &ScanResult, idx: usize) {
    print::tree_head(idx, result.title());
    let details: Vec<(String, ColoredString)> = vec![
        ("Url".to_string(), result.url().normal()),
        (
            "Error".to_string(),
            result.error().unwrap_or_default().color(colors::UNAVAILABLE),
        ),
    ];
    print::as_tree_one_level(details);
}
