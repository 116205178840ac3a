use std::error::Error;

use async_trait::async_trait;
use sdstatus_common::error::{ProbeError, ScanError};

/// Issues status requests on behalf of the probes.
///
/// One client is shared by every concurrently running probe, so
/// implementations must be safe for concurrent use.
#[async_trait]
pub trait StatusClient: Send + Sync {
    /// GETs `url` and returns the body of a 2xx response.
    ///
    /// Any other status is reported as [`ProbeError::Status`].
    async fn get_text(&self, url: &str) -> Result<String, ProbeError>;

    /// Checked once before a scan launches any probe.
    async fn ensure_ready(&self) -> Result<(), ScanError> {
        Ok(())
    }
}

#[async_trait]
impl StatusClient for reqwest::Client {
    async fn get_text(&self, url: &str) -> Result<String, ProbeError> {
        let response = self.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.text().await.map_err(transport_error)
    }
}

/// Flattens a reqwest error and its sources into one line.
fn transport_error(err: reqwest::Error) -> ProbeError {
    let mut message: String = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    ProbeError::Transport(message)
}
