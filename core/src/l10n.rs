//! Locale coverage across scanned instances.
//!
//! Built from the JSON output of an earlier scan, either the array written in
//! batch mode or the line-per-result output of a streamed scan: for every
//! locale an instance advertises, which sites offer it.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use sdstatus_common::scan::result::ScanResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum L10nError {
    #[error("could not read scan results: {0}")]
    Io(#[from] std::io::Error),

    #[error("not the JSON output of a scan: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Site titles per locale, both sorted.
pub type LocaleSites = BTreeMap<String, BTreeSet<String>>;

pub fn read_results<R: Read>(mut reader: R) -> Result<Vec<ScanResult>, L10nError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(&text)?);
    }
    serde_json::Deserializer::from_str(&text)
        .into_iter::<ScanResult>()
        .map(|result| result.map_err(L10nError::from))
        .collect()
}

pub fn locale_sites(results: &[ScanResult]) -> LocaleSites {
    let mut locales = LocaleSites::new();
    for result in results {
        let Some(metadata) = result.metadata() else {
            continue;
        };
        for locale in &metadata.supported_languages {
            locales
                .entry(locale.clone())
                .or_default()
                .insert(result.title().to_string());
        }
    }
    locales
}

/// Formats the report as one block per locale:
///
/// ```text
/// de_DE (2):
///   Site A
///   Site B
///
/// ```
pub fn format_report(locales: &LocaleSites) -> String {
    let mut report = String::new();
    for (locale, sites) in locales {
        let names: Vec<&str> = sites.iter().map(String::as_str).collect();
        report.push_str(&format!(
            "{locale} ({}):\n  {}\n\n",
            sites.len(),
            names.join("\n  ")
        ));
    }
    report
}
