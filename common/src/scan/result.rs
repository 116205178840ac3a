use serde::{Deserialize, Serialize};

use super::metadata::Metadata;
use super::target::ScanTarget;
use crate::error::ProbeError;

/// Outcome of probing one target.
///
/// Only the two constructors build a result, which keeps `available` in step
/// with the optional fields: an available result carries metadata and no
/// error, an unavailable one carries a non-empty error and no metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    title: String,
    url: String,
    available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl ScanResult {
    pub fn available(target: &ScanTarget, metadata: Metadata) -> Self {
        Self {
            title: target.title().to_string(),
            url: target.metadata_url(),
            available: true,
            error: None,
            metadata: Some(metadata),
        }
    }

    pub fn unavailable(target: &ScanTarget, error: &ProbeError) -> Self {
        Self {
            title: target.title().to_string(),
            url: target.metadata_url(),
            available: false,
            error: Some(error.to_string()),
            metadata: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Whether the availability flag agrees with the optional fields.
    ///
    /// Always true for constructed results; decoded input may violate it.
    pub fn is_consistent(&self) -> bool {
        match (self.available, &self.error, &self.metadata) {
            (true, None, Some(_)) => true,
            (false, Some(error), None) => !error.is_empty(),
            _ => false,
        }
    }
}
