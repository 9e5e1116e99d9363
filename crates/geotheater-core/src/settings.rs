use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DashboardError, Result};

/// Published CSV export of the venue's visitor spreadsheet.
pub const DEFAULT_SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQcHq8S95KEDLjRWqbhjOXy6SGEPTY9HQ0VtrRJUFfHoySrzfWqd9SOdA5sED6B7k4_u9VhPEyRYIIy/pub?gid=1313568463&single=true&output=csv";

/// Name of the per-user configuration directory under `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".geotheater";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Visitor analytics dashboard for the Geotheater guest book
#[derive(Parser, Debug, Clone)]
#[command(
    name = "geotheater",
    about = "Visitor analytics dashboard for the Geotheater guest book",
    version
)]
pub struct Settings {
    /// URL of the published visitor log (CSV)
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Read the visitor log from a local file instead of the URL
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Field delimiter of the visitor log
    #[arg(long, default_value = "comma", value_parser = ["comma", "semicolon", "auto"])]
    pub delimiter: String,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary", "export"])]
    pub view: String,

    /// Output path for the export view
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Endpoint of the insight-generation service (fallback text when unset)
    #[arg(long)]
    pub insight_endpoint: Option<String>,

    /// Bearer token for the insight-generation service
    #[arg(long, env = "GEOTHEATER_INSIGHT_API_KEY", hide_env_values = true)]
    pub insight_api_key: Option<String>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.geotheater/last_used.json`.
///
/// The insight API key is deliberately absent.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_endpoint: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(CONFIG_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins. clap keys args by field name, not flag spelling.
        if !is_arg_explicitly_set(&matches, "source_url") {
            if let Some(v) = last.source_url {
                settings.source_url = v;
            }
        }
        // An explicit --source-url also discards a remembered file.
        if !is_arg_explicitly_set(&matches, "file")
            && !is_arg_explicitly_set(&matches, "source_url")
            && settings.file.is_none()
        {
            settings.file = last.file;
        }
        if !is_arg_explicitly_set(&matches, "delimiter") {
            if let Some(v) = last.delimiter {
                settings.delimiter = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "insight_endpoint")
            && settings.insight_endpoint.is_none()
        {
            settings.insight_endpoint = last.insight_endpoint;
        }

        settings = Self::apply_debug_flag(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!(error = %e, "could not persist last-used settings");
        }

        settings
    }

    /// Check combinations clap cannot express on its own.
    pub fn validate(&self) -> Result<()> {
        if self.view == "export" && self.output.is_none() {
            return Err(DashboardError::Config(
                "--view export requires --output <path>".to_string(),
            ));
        }
        if self.file.is_none() && self.source_url.trim().is_empty() {
            return Err(DashboardError::Config(
                "either --file or a non-empty --source-url is required".to_string(),
            ));
        }
        Ok(())
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            source_url: Some(s.source_url.clone()),
            file: s.file.clone(),
            delimiter: Some(s.delimiter.clone()),
            theme: Some(s.theme.clone()),
            // A one-shot export is never remembered as the default view.
            view: (s.view != "export").then(|| s.view.clone()),
            insight_endpoint: s.insight_endpoint.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams persistence ────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            source_url: Some("https://example.test/log.csv".to_string()),
            file: Some(PathBuf::from("/srv/buku_tamu.csv")),
            delimiter: Some("semicolon".to_string()),
            theme: Some("dark".to_string()),
            view: Some("summary".to_string()),
            insight_endpoint: Some("https://insight.example.test".to_string()),
        };

        params.save_to(&path).expect("save");
        let loaded = LastUsedParams::load_from(&path);

        assert_eq!(loaded.source_url.as_deref(), Some("https://example.test/log.csv"));
        assert_eq!(loaded.file, Some(PathBuf::from("/srv/buku_tamu.csv")));
        assert_eq!(loaded.delimiter.as_deref(), Some("semicolon"));
        assert_eq!(loaded.theme.as_deref(), Some("dark"));
        assert_eq!(loaded.view.as_deref(), Some("summary"));
        assert_eq!(
            loaded.insight_endpoint.as_deref(),
            Some("https://insight.example.test")
        );
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists(), "file must exist after save");

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists(), "file must be gone after clear");
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.source_url.is_none());
        assert!(loaded.file.is_none());
        assert!(loaded.theme.is_none());
        assert!(loaded.view.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.theme.is_none());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["geotheater"]);

        assert_eq!(settings.source_url, DEFAULT_SOURCE_URL);
        assert!(settings.file.is_none());
        assert_eq!(settings.delimiter, "comma");
        assert_eq!(settings.view, "dashboard");
        assert!(settings.output.is_none());
        assert_eq!(settings.theme, "auto");
        assert!(settings.insight_endpoint.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_file_and_delimiter() {
        let settings = Settings::parse_from([
            "geotheater",
            "--file",
            "/tmp/log.csv",
            "--delimiter",
            "semicolon",
        ]);
        assert_eq!(settings.file, Some(PathBuf::from("/tmp/log.csv")));
        assert_eq!(settings.delimiter, "semicolon");
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        let result = Settings::try_parse_from(["geotheater", "--view", "charts"]);
        assert!(result.is_err());
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_export_requires_output() {
        let settings = Settings::parse_from(["geotheater", "--view", "export"]);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("--output"));

        let settings =
            Settings::parse_from(["geotheater", "--view", "export", "--output", "/tmp/s.json"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_source_without_file() {
        let settings = Settings::parse_from(["geotheater", "--source-url", " "]);
        assert!(settings.validate().is_err());

        let settings =
            Settings::parse_from(["geotheater", "--source-url", " ", "--file", "/tmp/a.csv"]);
        assert!(settings.validate().is_ok());
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            delimiter: Some("semicolon".to_string()),
            file: Some(PathBuf::from("/srv/log.csv")),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(vec!["geotheater".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.delimiter, "semicolon");
        assert_eq!(settings.file, Some(PathBuf::from("/srv/log.csv")));
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["geotheater".into(), "--theme".into(), "light".into()],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_load_with_last_used_explicit_source_url_drops_persisted_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["geotheater".into(), "--file".into(), "/srv/old.csv".into()],
            &config_path,
        );

        let settings = Settings::load_with_last_used_impl(
            vec![
                "geotheater".into(),
                "--source-url".into(),
                "https://example.test/new.csv".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.source_url, "https://example.test/new.csv");
        assert!(settings.file.is_none());

        // The URL is now the remembered source.
        let settings = Settings::load_with_last_used_impl(vec!["geotheater".into()], &config_path);
        assert_eq!(settings.source_url, "https://example.test/new.csv");
        assert!(settings.file.is_none());
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        Settings::load_with_last_used_impl(
            vec!["geotheater".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["geotheater".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_does_not_persist_export_view() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "geotheater".into(),
                "--view".into(),
                "export".into(),
                "--output".into(),
                "/tmp/stats.json".into(),
            ],
            &config_path,
        );

        let loaded = LastUsedParams::load_from(&config_path);
        assert!(loaded.view.is_none());
    }

    #[test]
    fn test_load_with_last_used_never_persists_api_key() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "geotheater".into(),
                "--insight-api-key".into(),
                "secret-token".into(),
                "--theme".into(),
                "classic".into(),
            ],
            &config_path,
        );

        let raw = std::fs::read_to_string(&config_path).expect("persisted");
        assert!(!raw.contains("secret-token"));
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.theme.as_deref(), Some("classic"));
    }
}
