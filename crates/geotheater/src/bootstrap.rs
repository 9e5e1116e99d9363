use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use geotheater_core::settings::{Settings, CONFIG_DIR_NAME};
use geotheater_data::parser::{Delimiter, ParseOptions};
use geotheater_data::source::{build_http_client, FileLogSource, HttpLogSource, LogSource};
use geotheater_runtime::insights::{HttpInsightProvider, InsightService};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.geotheater/`, or `./.geotheater/` when no home directory is known.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default log file used by the interactive dashboard.
pub fn default_log_file() -> PathBuf {
    app_dir().join("logs").join("geotheater.log")
}

/// Ensure `~/.geotheater/` and `~/.geotheater/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a tracing filter directive.
fn normalise_level(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to `log_file` when given, otherwise to stderr. Falls back to
/// `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = log_file.is_none().then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

// ── Component wiring ───────────────────────────────────────────────────────────

/// Parser options from `--delimiter`.
pub fn parse_options(settings: &Settings) -> anyhow::Result<ParseOptions> {
    let delimiter: Delimiter = settings.delimiter.parse()?;
    Ok(ParseOptions { delimiter })
}

/// `--file` wins over `--source-url`.
pub fn build_source(settings: &Settings) -> anyhow::Result<Box<dyn LogSource>> {
    Ok(match settings.file {
        Some(ref path) => Box::new(FileLogSource::new(path.clone())),
        None => Box::new(HttpLogSource::new(settings.source_url.clone())?),
    })
}

/// An insight service for `--insight-endpoint`, or a disabled one.
pub fn build_insights(settings: &Settings) -> anyhow::Result<InsightService> {
    Ok(match settings.insight_endpoint {
        Some(ref endpoint) => InsightService::new(Box::new(HttpInsightProvider::new(
            endpoint.clone(),
            settings.insight_api_key.clone(),
            build_http_client()?,
        ))),
        None => InsightService::disabled(),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
