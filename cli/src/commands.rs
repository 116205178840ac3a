pub mod l10n;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use sdstatus_common::config::{Config, DEFAULT_PROXY, DEFAULT_TIMEOUT_SECS, Format, OutputMode};
use sdstatus_core::targets::DIRECTORY_URL;

#[derive(Parser)]
#[command(name = "sdstatus")]
#[command(about = "Reports metadata about SecureDrop sites.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Log probe progress and other details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve metadata from SecureDrop sites
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Report localization coverage from the output of a previous scan
    L10n {
        /// The JSON output of a previous "scan", batch or streamed
        #[arg(value_name = "INPUTFILE")]
        input_file: PathBuf,
    },
}

#[derive(Args)]
pub struct ScanArgs {
    /// Onion addresses to scan, separated by spaces or commas
    #[arg(value_name = "ONION_URL")]
    pub onion_urls: Vec<String>,

    /// Read sites to scan from the securedrop.org directory
    #[arg(short, long)]
    pub directory: bool,

    #[arg(long, default_value = DIRECTORY_URL, hide = true)]
    pub directory_url: String,

    /// Output format: "csv" or "json"
    #[arg(short, long, default_value = "json")]
    pub format: Format,

    /// Read sites to scan from a CSV file with "onion_address" and "title" columns
    #[arg(short, long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Direct output to the named file instead of the terminal
    #[arg(short, long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Maximum time in seconds to wait for a response from a site
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Write each result as soon as it arrives (unsorted)
    #[arg(short, long)]
    pub stream: bool,

    /// SOCKS5 proxy to route requests through
    #[arg(long, default_value = DEFAULT_PROXY)]
    pub proxy: String,
}

impl ScanArgs {
    pub fn has_sources(&self) -> bool {
        !self.onion_urls.is_empty() || self.input_file.is_some() || self.directory
    }

    pub fn config(&self) -> Config {
        Config {
            proxy: self.proxy.clone(),
            timeout: Duration::from_secs(self.timeout),
            format: self.format,
            mode: if self.stream {
                OutputMode::Streaming
            } else {
                OutputMode::Batch
            },
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
