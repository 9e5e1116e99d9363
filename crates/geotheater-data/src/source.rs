//! Where the raw visitor log comes from.
//!
//! The published spreadsheet is fetched over HTTP; a local export can be
//! read from disk instead. Both implement [`LogSource`] so the session does
//! not care which one it holds.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use geotheater_core::error::{DashboardError, Result};
use tracing::debug;

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("geotheater/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared HTTP client used for log fetches and insight requests.
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| DashboardError::Transport(e.to_string()))
}

/// A provider of raw visitor-log text.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Human-readable origin, used in logs and the header bar.
    fn describe(&self) -> String;

    /// Retrieve the full log text.
    async fn fetch(&self) -> Result<String>;
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

/// Fetches the log from a published CSV URL.
pub struct HttpLogSource {
    url: String,
    client: reqwest::Client,
}

impl HttpLogSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(url, build_http_client()?))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl LogSource for HttpLogSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String> {
        debug!("Fetching visitor log from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }
}

// ── File ──────────────────────────────────────────────────────────────────────

/// Reads the log from a local export.
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DashboardError::FileRead {
                path: self.path.clone(),
                source,
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
