//! # Scan Model
//!
//! Everything a scan consumes or produces. A [`target::ScanTarget`] goes in,
//! exactly one [`result::ScanResult`] comes out, and all results of one run
//! are frozen into a [`batch::ScanBatch`].

pub mod batch;
pub mod metadata;
pub mod result;
pub mod target;
