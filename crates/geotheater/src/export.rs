use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use geotheater_core::models::SummaryStatistics;
use geotheater_runtime::session::{DashboardSnapshot, DataOrigin};
use serde::Serialize;

/// JSON document written by `--view export`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub loaded_at: DateTime<Utc>,
    /// `"source"` or `"fallback"`.
    pub origin: &'static str,
    pub warning: Option<&'a str>,
    pub stats: &'a SummaryStatistics,
}

impl<'a> ExportDocument<'a> {
    pub fn from_snapshot(snapshot: &'a DashboardSnapshot) -> Self {
        Self {
            loaded_at: snapshot.loaded_at,
            origin: match snapshot.origin {
                DataOrigin::Source => "source",
                DataOrigin::Fallback => "fallback",
            },
            warning: snapshot.warning.as_deref(),
            stats: &snapshot.stats,
        }
    }
}

/// Write the snapshot's statistics to `path` as pretty JSON.
///
/// The document goes to a sibling temp file first and is renamed into place.
pub fn write_export(snapshot: &DashboardSnapshot, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&ExportDocument::from_snapshot(snapshot))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("renaming to {}", path.display()))?;

    tracing::info!(path = %path.display(), total = snapshot.stats.total, "statistics exported");
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use geotheater_data::sample::{fallback_records, FETCH_FAILED_WARNING};
    use tempfile::TempDir;

    #[test]
    fn test_write_export_fallback_snapshot() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("out").join("stats.json");
        let snapshot = DashboardSnapshot::from_records(
            fallback_records(),
            DataOrigin::Fallback,
            Some(FETCH_FAILED_WARNING.to_string()),
        );

        write_export(&snapshot, &path).expect("export");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["origin"], "fallback");
        assert_eq!(value["warning"], FETCH_FAILED_WARNING);
        assert_eq!(value["stats"]["total"], 1);
        assert_eq!(value["stats"]["subdistricts"]["Coblong"], 1);
        assert!(value["loadedAt"].is_string());
        assert!(!tmp.path().join("out").join("stats.json.tmp").exists());
    }

    #[test]
    fn test_export_document_without_warning() {
        let snapshot = DashboardSnapshot::empty();
        let doc = ExportDocument::from_snapshot(&snapshot);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["origin"], "source");
        assert!(value["warning"].is_null());
        assert_eq!(value["stats"]["total"], 0);
    }
}
