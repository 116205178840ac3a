//! Probe lifecycle notifications.
//!
//! Progress is advisory: sinks receive a human-readable update when a probe
//! starts and when it finishes, and whatever they do with it has no bearing on
//! the scan's results. A sink is called from many probes at once and must not
//! block.

use std::fmt;

use sdstatus_common::scan::{result::ScanResult, target::ScanTarget};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeUpdate {
    Started { title: String },
    Finished { title: String, available: bool },
}

impl ProbeUpdate {
    pub fn started(target: &ScanTarget) -> Self {
        Self::Started {
            title: target.title().to_string(),
        }
    }

    pub fn finished(result: &ScanResult) -> Self {
        Self::Finished {
            title: result.title().to_string(),
            available: result.is_available(),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }
}

impl fmt::Display for ProbeUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { title } => write!(f, "Checking {title}"),
            Self::Finished { title, .. } => write!(f, "Finished checking {title}"),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn report(&self, update: &ProbeUpdate);
}

/// Discards every update. The default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _update: &ProbeUpdate) {}
}

/// Writes updates as debug events.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, update: &ProbeUpdate) {
        debug!(target: "sdstatus::progress", "{update}");
    }
}

/// Forwards updates as lines into a queue drained by a single consumer.
///
/// Sending never blocks; updates are dropped once the consumer is gone.
#[derive(Clone, Debug)]
pub struct ChannelProgress {
    tx: UnboundedSender<String>,
}

impl ChannelProgress {
    pub fn channel() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, update: &ProbeUpdate) {
        let _ = self.tx.send(update.to_string());
    }
}

impl<F> ProgressSink for F
where
    F: Fn(&ProbeUpdate) + Send + Sync,
{
    fn report(&self, update: &ProbeUpdate) {
        self(update)
    }
}
