//! # Target Acquisition
//!
//! Collects the sites to scan from the places a user can name them:
//! * addresses given directly (single or comma-separated),
//! * a CSV file with `onion_address` and `title` columns,
//! * the public SecureDrop directory.
//!
//! Every source feeds a [`TargetSet`], which keeps one target per address.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sdstatus_common::error::ProbeError;
use sdstatus_common::scan::target::ScanTarget;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::network::client::StatusClient;

pub const DIRECTORY_URL: &str = "https://securedrop.org/api/v1/directory/";

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid target list: {0}")]
    Parse(String),

    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read sites from {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not fetch the directory: {0}")]
    Fetch(#[from] ProbeError),

    #[error("could not decode the directory: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Targets keyed by address. Re-adding an address replaces the earlier entry.
#[derive(Clone, Debug, Default)]
pub struct TargetSet {
    by_address: BTreeMap<String, ScanTarget>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the address was not present before.
    pub fn insert(&mut self, target: ScanTarget) -> bool {
        self.by_address
            .insert(target.address().to_string(), target)
            .is_none()
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    /// Targets ordered by address.
    pub fn into_targets(self) -> Vec<ScanTarget> {
        self.by_address.into_values().collect()
    }
}

impl Extend<ScanTarget> for TargetSet {
    fn extend<I: IntoIterator<Item = ScanTarget>>(&mut self, iter: I) {
        for target in iter {
            self.insert(target);
        }
    }
}

impl FromIterator<ScanTarget> for TargetSet {
    fn from_iter<I: IntoIterator<Item = ScanTarget>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Parses a comma-separated list of addresses (e.g. `"a.onion, b.onion"`).
pub fn parse_list(s: &str) -> Result<Vec<ScanTarget>, TargetError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| ScanTarget::from_str(part).map_err(TargetError::Parse))
        .collect()
}

#[derive(Debug, Deserialize)]
struct InputRow {
    onion_address: String,
    #[serde(default)]
    title: String,
}

/// Reads sites from a CSV file with a header row naming at least
/// `onion_address` and optionally `title`. Other columns are ignored.
pub fn read_input_file(path: &Path) -> Result<Vec<ScanTarget>, TargetError> {
    info!("Reading SecureDrops to scan from {}", path.display());
    let file = File::open(path).map_err(|source| TargetError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let mut targets: Vec<ScanTarget> = Vec::new();

    for row in reader.deserialize::<InputRow>() {
        let row: InputRow = row.map_err(|source| TargetError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let target = ScanTarget::new(row.title, row.onion_address);
        if target.address().is_empty() {
            warn!("Skipping a row without an onion address in {}", path.display());
            continue;
        }
        targets.push(target);
    }

    Ok(targets)
}

/// One listing of the SecureDrop directory API.
#[derive(Clone, Debug, Deserialize)]
pub struct DirectoryEntry {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub onion_address: String,
    #[serde(default)]
    pub landing_page_url: Option<String>,
    #[serde(default)]
    pub directory_url: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl DirectoryEntry {
    /// `None` when the listing has no usable onion address.
    pub fn to_target(&self) -> Option<ScanTarget> {
        let target = ScanTarget::new(&self.title, &self.onion_address);
        if target.address().is_empty() {
            return None;
        }
        Some(target)
    }
}

/// Fetches the directory at `url` and converts its listings into targets.
pub async fn fetch_directory<C>(client: &C, url: &str) -> Result<Vec<ScanTarget>, TargetError>
where
    C: StatusClient + ?Sized,
{
    info!("Reading SecureDrops to scan from {url}");
    let body: String = client.get_text(url).await?;
    let entries: Vec<DirectoryEntry> = serde_json::from_str(&body)?;

    let mut targets: Vec<ScanTarget> = Vec::with_capacity(entries.len());
    for entry in &entries {
        match entry.to_target() {
            Some(target) => targets.push(target),
            None => warn!("Directory entry '{}' has no onion address", entry.title),
        }
    }
    Ok(targets)
}
