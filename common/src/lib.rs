//! # sdstatus common types
//!
//! Shared vocabulary for the scanner crates:
//!
//! * **[`scan`]**: targets, decoded metadata, per-target results and the batch.
//! * **[`error`]**: the per-probe and setup error taxonomy.
//! * **[`config`]**: runtime configuration and output selection.

pub mod config;
pub mod error;
pub mod scan;
