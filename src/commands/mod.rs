//! CLI command implementations.

pub mod scan;

pub use scan::{ScanCommand, ScanSummary};
