//! Error taxonomy for locator requests and region validation.

use thiserror::Error;

/// Failures produced while talking to the store locator or validating a region.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocatorError {
    /// Network-level failure: connect, timeout, body read.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Request failed with status: {0}")]
    Status(u16),

    /// The body was not the JSON shape we expected.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),
}

impl From<wreq::Error> for LocatorError {
    fn from(err: wreq::Error) -> Self {
        LocatorError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for LocatorError {
    fn from(err: serde_json::Error) -> Self {
        LocatorError::Parse(err.to_string())
    }
}
