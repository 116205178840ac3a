//! # sdstatus core
//!
//! The scanning engine. A [`scanner::Scanner`] fans one [`probe`] out per
//! target over a shared [`network::client::StatusClient`], and
//! [`render`] turns the collected results into JSON or CSV.
//!
//! * **[`targets`]**: where scan targets come from (arguments, files, the directory).
//! * **[`progress`]**: best-effort lifecycle notifications.
//! * **[`l10n`]**: locale coverage reports built from earlier scans.

pub mod l10n;
pub mod network;
pub mod probe;
pub mod progress;
pub mod render;
pub mod scanner;
pub mod targets;
