use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Geotheater dashboard crates.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A local visitor log could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote endpoint answered with a non-success status.
    #[error("Request to {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The insight collaborator returned something unusable.
    #[error("Insight generation failed: {0}")]
    Insight(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
