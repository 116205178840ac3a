use std::time::Duration;

use thiserror::Error;

/// Everything that can make a single target unavailable.
///
/// These never abort a scan; they are rendered into the target's result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Connection refused, proxy failure, TLS or body read error.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("status {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The instance answered, but not with a status document.
    #[error("malformed metadata: {0}")]
    Decode(String),

    /// The probe task itself faulted.
    #[error("probe aborted: {0}")]
    Aborted(String),
}

/// Failures that stop a scan before any probe is launched.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scanner setup failed: {0}")]
    Setup(String),
}
