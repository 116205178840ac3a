//! End-to-end checks of the scanner over real HTTP.
//!
//! Targets are local mock servers reached with a plain `reqwest` client; the
//! proxy is the only piece left out.

pub mod utils;

#[cfg(test)]
mod scan;
