//! The concurrent scan orchestrator.
//!
//! Every target gets its own task running a [`probe`]; no concurrency limit
//! is applied, since each probe is a single outbound request that spends its
//! life waiting on the network. Results flow through one channel whose only
//! receiver is the [`ScanStream`], so the probes never share mutable state.
//!
//! The stream ends once every task has reported, which makes
//! [`ScanStream::collect`] the barrier for the whole batch. A task that
//! panics still reports: the panic is turned into an unavailable result.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use sdstatus_common::error::{ProbeError, ScanError};
use sdstatus_common::scan::{batch::ScanBatch, result::ScanResult, target::ScanTarget};
use tokio::sync::mpsc::{self, Receiver};
use tracing::{debug, error, info};

use crate::network::client::StatusClient;
use crate::probe::probe;
use crate::progress::{NoProgress, ProgressSink};

pub struct Scanner<C> {
    client: Arc<C>,
    timeout: Duration,
    progress: Arc<dyn ProgressSink>,
}

impl<C> Scanner<C>
where
    C: StatusClient + 'static,
{
    /// A scanner whose probes share `client` and give up after `timeout`.
    pub fn new(client: C, timeout: Duration) -> Self {
        Self {
            client: Arc::new(client),
            timeout,
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'static) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    /// Probes every target and waits for all of them.
    ///
    /// Per-target failures are part of the returned batch; the only error is
    /// a setup failure detected before any probe is launched.
    pub async fn scan(&self, targets: Vec<ScanTarget>) -> Result<ScanBatch, ScanError> {
        Ok(self.launch(targets).await?.collect().await)
    }

    /// Starts one probe per target and returns the stream of their results
    /// in arrival order.
    ///
    /// Fails without launching anything if the client is not ready.
    pub async fn launch(&self, targets: Vec<ScanTarget>) -> Result<ScanStream, ScanError> {
        self.ensure_ready().await?;

        let expected: usize = targets.len();
        let (tx, rx) = mpsc::channel::<ScanResult>(expected.max(1));
        info!("Scanning {expected} sites with a {}s timeout", self.timeout.as_secs_f64());

        for target in targets {
            let tx = tx.clone();
            let client = Arc::clone(&self.client);
            let progress = Arc::clone(&self.progress);
            let limit: Duration = self.timeout;

            tokio::spawn(async move {
                let outcome = AssertUnwindSafe(probe(client.as_ref(), &target, limit, progress.as_ref()))
                    .catch_unwind()
                    .await;

                let result: ScanResult = outcome.unwrap_or_else(|panic| {
                    let reason: String = panic_message(panic.as_ref());
                    error!("Probe for {} aborted: {reason}", target.title());
                    ScanResult::unavailable(&target, &ProbeError::Aborted(reason))
                });

                // Capacity equals the target count, so this never waits.
                if tx.send(result).await.is_err() {
                    debug!("Result for {} dropped, nobody is listening", target.title());
                }
            });
        }

        Ok(ScanStream { rx, expected })
    }

    async fn ensure_ready(&self) -> Result<(), ScanError> {
        if self.timeout.is_zero() {
            return Err(ScanError::Setup("timeout must be greater than zero".into()));
        }
        self.client.ensure_ready().await
    }
}

/// Results of a running scan, one per launched probe.
#[derive(Debug)]
pub struct ScanStream {
    rx: Receiver<ScanResult>,
    expected: usize,
}

impl ScanStream {
    /// Number of results the stream will yield in total.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// The next result to arrive, or `None` once every probe has reported.
    pub async fn next(&mut self) -> Option<ScanResult> {
        self.rx.recv().await
    }

    /// Waits for every probe and freezes the results into a batch.
    pub async fn collect(mut self) -> ScanBatch {
        let mut results: Vec<ScanResult> = Vec::with_capacity(self.expected);
        while let Some(result) = self.rx.recv().await {
            results.push(result);
        }
        results.into_iter().collect()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "probe panicked".to_string()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
