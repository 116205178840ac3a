use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Local SOCKS endpoint of the Tor daemon.
pub const DEFAULT_PROXY: &str = "127.0.0.1:9050";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub struct Config {
    /// `host:port` of the SOCKS5 proxy every request is routed through.
    pub proxy: String,
    /// Upper bound for a single probe. Shared by every probe of a run.
    pub timeout: Duration,
    pub format: Format,
    pub mode: OutputMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy: DEFAULT_PROXY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            format: Format::Json,
            mode: OutputMode::Batch,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Csv,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("output format may only be json or csv, got '{s}'")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// When results are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Wait for every probe, then write one document sorted by title.
    #[default]
    Batch,
    /// Write each result the moment it arrives. Not sorted.
    Streaming,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<Format>(), Ok(Format::Json));
        assert_eq!("csv".parse::<Format>(), Ok(Format::Csv));
        assert!("xml".parse::<Format>().is_err());
        assert_eq!(Format::Csv.to_string(), "csv");
    }

    #[test]
    fn defaults_match_tor() {
        let cfg = Config::default();
        assert_eq!(cfg.proxy, "127.0.0.1:9050");
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert_eq!(cfg.mode, OutputMode::Batch);
    }
}
