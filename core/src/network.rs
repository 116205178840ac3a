//! HTTP access to the scanned instances.
//!
//! [`client::StatusClient`] is the seam the probe talks to; [`proxy`] builds
//! the production implementation that tunnels through Tor.

pub mod client;
pub mod proxy;
