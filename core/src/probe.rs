//! A single status check against one target.
//!
//! The probe is where every per-target failure ends up: connection errors,
//! proxy errors, bad statuses, timeouts and malformed documents all become an
//! unavailable [`ScanResult`]. Nothing escapes as an error.

use std::time::Duration;

use sdstatus_common::error::ProbeError;
use sdstatus_common::scan::{metadata::Metadata, result::ScanResult, target::ScanTarget};
use tokio::time::timeout;
use tracing::debug;

use crate::network::client::StatusClient;
use crate::progress::{ProbeUpdate, ProgressSink};

pub async fn probe<C>(
    client: &C,
    target: &ScanTarget,
    limit: Duration,
    progress: &dyn ProgressSink,
) -> ScanResult
where
    C: StatusClient + ?Sized,
{
    progress.report(&ProbeUpdate::started(target));

    let result: ScanResult = match fetch_metadata(client, &target.metadata_url(), limit).await {
        Ok(metadata) => ScanResult::available(target, metadata),
        Err(e) => {
            debug!("Error retrieving {}: {e}", target.title());
            ScanResult::unavailable(target, &e)
        }
    };

    progress.report(&ProbeUpdate::finished(&result));
    result
}

async fn fetch_metadata<C>(client: &C, url: &str, limit: Duration) -> Result<Metadata, ProbeError>
where
    C: StatusClient + ?Sized,
{
    let body: String = timeout(limit, client.get_text(url))
        .await
        .map_err(|_elapsed| ProbeError::Timeout(limit))??;

    Metadata::decode(&body)
}
