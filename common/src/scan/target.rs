//! # Scan Target Model
//!
//! Defines the input of a single probe.
//!
//! A target is a human label plus the address of a hidden service, e.g.
//! `Example News` / `examplenewsxyz.onion`. When only an address is known the
//! title falls back to the address itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Path of the status document every instance serves.
pub const METADATA_PATH: &str = "/metadata";

/// Represents one service to be probed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScanTarget {
    title: String,
    address: String,
}

impl ScanTarget {
    pub fn new(title: impl Into<String>, address: impl Into<String>) -> Self {
        let address: String = address.into();
        let address: String = normalize_address(&address);
        let title: String = title.into();
        let title: String = match title.trim() {
            "" => address.clone(),
            trimmed => trimmed.to_string(),
        };
        Self { title, address }
    }

    /// A target labelled by its own address.
    pub fn from_address(address: impl Into<String>) -> Self {
        let address: String = address.into();
        let address: String = normalize_address(&address);
        Self {
            title: address.clone(),
            address,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// The status endpoint of this target, e.g. `http://abc.onion/metadata`.
    pub fn metadata_url(&self) -> String {
        format!("http://{}{}", self.address, METADATA_PATH)
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title == self.address {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} ({})", self.title, self.address)
        }
    }
}

impl FromStr for ScanTarget {
    type Err = String;

    /// Parses a bare address (`abc.onion`, `http://abc.onion/`) into a target
    /// titled by its address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address: String = normalize_address(s);
        if address.is_empty() {
            return Err(format!("invalid target: '{s}' has no address"));
        }
        if address.contains(char::is_whitespace) {
            return Err(format!("invalid target: '{s}' contains whitespace"));
        }
        Ok(Self::from_address(address))
    }
}

/// Strips surrounding whitespace, a leading `http://`/`https://` and trailing slashes.
fn normalize_address(raw: &str) -> String {
    let trimmed: &str = raw.trim();
    let without_scheme: &str = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(trimmed);
    without_scheme.trim_end_matches('/').to_string()
}
