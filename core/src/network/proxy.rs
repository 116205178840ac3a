//! Construction of the Tor-bound HTTP client.
//!
//! Every connection goes through a SOCKS5 proxy with remote name resolution
//! (`socks5h`), which onion addresses require.

use std::time::Duration;

use async_trait::async_trait;
use sdstatus_common::error::{ProbeError, ScanError};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::network::client::StatusClient;

const USER_AGENT: &str = concat!("sdstatus/", env!("CARGO_PKG_VERSION"));
const DEFAULT_SOCKS_PORT: u16 = 1080;

/// An HTTP client that sends every request through a SOCKS proxy.
///
/// Before a scan it checks that the proxy accepts connections, so a missing
/// Tor daemon fails the run instead of marking every site unavailable.
#[derive(Clone, Debug)]
pub struct ProxiedClient {
    http: reqwest::Client,
    endpoint: String,
    connect_timeout: Duration,
}

impl ProxiedClient {
    /// `host:port` of the proxy.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatusClient for ProxiedClient {
    async fn get_text(&self, url: &str) -> Result<String, ProbeError> {
        self.http.get_text(url).await
    }

    async fn ensure_ready(&self) -> Result<(), ScanError> {
        debug!("Checking proxy at {}", self.endpoint);
        match timeout(self.connect_timeout, TcpStream::connect(self.endpoint.as_str())).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ScanError::Setup(format!(
                "proxy {} is unreachable: {e}",
                self.endpoint
            ))),
            Err(_) => Err(ScanError::Setup(format!(
                "proxy {} did not accept a connection within {}s",
                self.endpoint,
                self.connect_timeout.as_secs_f64()
            ))),
        }
    }
}

/// Builds a client routing all requests through `proxy` (`host:port`).
pub fn build_client(proxy: &str, timeout: Duration) -> Result<ProxiedClient, ScanError> {
    if timeout.is_zero() {
        return Err(ScanError::Setup("timeout must be greater than zero".into()));
    }

    let proxy_url: String = proxy_url(proxy)?;
    let endpoint: String = proxy_endpoint(&proxy_url)?;
    let proxy = reqwest::Proxy::all(proxy_url.as_str())
        .map_err(|e| ScanError::Setup(format!("invalid proxy '{proxy_url}': {e}")))?;

    debug!("Routing requests through {proxy_url}");

    let http = reqwest::Client::builder()
        .proxy(proxy)
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ScanError::Setup(format!("could not build http client: {e}")))?;

    Ok(ProxiedClient {
        http,
        endpoint,
        connect_timeout: timeout,
    })
}

fn proxy_url(proxy: &str) -> Result<String, ScanError> {
    let proxy: &str = proxy.trim();
    if proxy.is_empty() {
        return Err(ScanError::Setup("proxy address is empty".into()));
    }
    if proxy.contains("://") {
        return Ok(proxy.to_string());
    }
    Ok(format!("socks5h://{proxy}"))
}

/// The `host:port` a proxy URL points at, credentials dropped.
fn proxy_endpoint(proxy_url: &str) -> Result<String, ScanError> {
    let url = reqwest::Url::parse(proxy_url)
        .map_err(|e| ScanError::Setup(format!("invalid proxy '{proxy_url}': {e}")))?;
    let host: &str = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| ScanError::Setup(format!("proxy '{proxy_url}' has no host")))?;
    let port: u16 = url.port_or_known_default().unwrap_or(DEFAULT_SOCKS_PORT);
    Ok(format!("{host}:{port}"))
}
