use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::Context;
use tracing::info;

use sdstatus_core::l10n as report;

use crate::terminal::print;

pub fn l10n(input_file: &Path) -> anyhow::Result<()> {
    let file = File::open(input_file)
        .with_context(|| format!("Could not open {}", input_file.display()))?;
    let results = report::read_results(BufReader::new(file))
        .with_context(|| format!("Could not read scan results from {}", input_file.display()))?;

    let locales = report::locale_sites(&results);
    if locales.is_empty() {
        print::no_results();
        return Ok(());
    }

    info!(
        "{} locales offered across {} sites",
        locales.len(),
        results.len()
    );
    let mut stdout = io::stdout().lock();
    stdout.write_all(report::format_report(&locales).as_bytes())?;
    stdout.flush()?;
    Ok(())
}
