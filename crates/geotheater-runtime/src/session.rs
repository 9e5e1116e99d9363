//! Dashboard session state.
//!
//! [`DashboardSession`] owns the log source and the current
//! [`DashboardSnapshot`]. Each [`DashboardSession::reload`] runs the full
//! fetch → parse → fallback → aggregate pipeline and swaps in a new immutable
//! snapshot; readers holding the previous `Arc` are unaffected.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geotheater_core::models::{SummaryStatistics, VisitorRecord};
use geotheater_data::aggregator::aggregate;
use geotheater_data::parser::{parse_records, ParseOptions};
use geotheater_data::sample::{fallback_records, EMPTY_SOURCE_WARNING, FETCH_FAILED_WARNING};
use geotheater_data::source::LogSource;

// ── DashboardSnapshot ─────────────────────────────────────────────────────────

/// Where the records of a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Source,
    Fallback,
}

/// One immutable view of the visitor log and its statistics.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub records: Vec<VisitorRecord>,
    pub stats: SummaryStatistics,
    /// Non-fatal notice shown above the dashboard (e.g. fallback in use).
    pub warning: Option<String>,
    /// Why the source could not be fetched, when it could not.
    pub fetch_error: Option<String>,
    pub origin: DataOrigin,
    pub loaded_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// Snapshot held before the first load completes.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            stats: SummaryStatistics::default(),
            warning: None,
            fetch_error: None,
            origin: DataOrigin::Source,
            loaded_at: Utc::now(),
        }
    }

    /// Build a snapshot from `records`, computing the statistics.
    pub fn from_records(
        records: Vec<VisitorRecord>,
        origin: DataOrigin,
        warning: Option<String>,
    ) -> Self {
        let stats = aggregate(&records);
        Self {
            records,
            stats,
            warning,
            fetch_error: None,
            origin,
            loaded_at: Utc::now(),
        }
    }

    /// Attach the fetch failure that led to this snapshot.
    pub fn with_fetch_error(mut self, error: impl Into<String>) -> Self {
        self.fetch_error = Some(error.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last `n` records, newest first.
    pub fn recent_visits(&self, n: usize) -> Vec<&VisitorRecord> {
        self.records.iter().rev().take(n).collect()
    }

    /// Party sizes of the last `n` records, in log order.
    pub fn recent_party_sizes(&self, n: usize) -> Vec<u64> {
        let start = self.records.len().saturating_sub(n);
        self.records[start..]
            .iter()
            .map(|r| u64::from(r.party_size))
            .collect()
    }
}

// ── DashboardSession ──────────────────────────────────────────────────────────

/// Owns the log source and the latest snapshot.
pub struct DashboardSession {
    source: Box<dyn LogSource>,
    options: ParseOptions,
    current: Arc<DashboardSnapshot>,
}

impl DashboardSession {
    pub fn new(source: Box<dyn LogSource>, options: ParseOptions) -> Self {
        Self {
            source,
            options,
            current: Arc::new(DashboardSnapshot::empty()),
        }
    }

    /// Human-readable description of the log source.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch, parse and aggregate the log, replacing the current snapshot.
    ///
    /// Never fails: a fetch error or an empty log substitutes the built-in
    /// sample and records a warning on the snapshot.
    pub async fn reload(&mut self) -> Arc<DashboardSnapshot> {
        let snapshot = match self.source.fetch().await {
            Ok(text) => {
                let records = parse_records(&text, self.options);
                if records.is_empty() {
                    tracing::warn!(source = %self.source.describe(), "visitor log has no rows; using sample data");
                    DashboardSnapshot::from_records(
                        fallback_records(),
                        DataOrigin::Fallback,
                        Some(EMPTY_SOURCE_WARNING.to_string()),
                    )
                } else {
                    DashboardSnapshot::from_records(records, DataOrigin::Source, None)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, source = %self.source.describe(), "fetch failed; using sample data");
                DashboardSnapshot::from_records(
                    fallback_records(),
                    DataOrigin::Fallback,
                    Some(FETCH_FAILED_WARNING.to_string()),
                )
                .with_fetch_error(e.to_string())
            }
        };

        tracing::debug!(
            records = snapshot.records.len(),
            total = snapshot.stats.total,
            origin = ?snapshot.origin,
            "snapshot updated"
        );

        self.current = Arc::new(snapshot);
        Arc::clone(&self.current)
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        Arc::clone(&self.current)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use geotheater_core::error::{DashboardError, Result};
    use geotheater_data::source::{FileLogSource, HttpLogSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HEADER: &str = "Timestamp,Jenis,Nama,Usia,JK,Pekerjaan,Alamat,Desa,Kecamatan,Ketua,X,Instansi,Y,Z,Jumlah,L,P,Rentang";

    /// In-memory source returning canned responses in order.
    struct ScriptedSource {
        responses: Vec<Option<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Option<&str>>) -> Self {
            Self {
                responses: responses.into_iter().map(|r| r.map(str::to_string)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LogSource for ScriptedSource {
        fn describe(&self) -> String {
            "scripted".to_string()
        }

        async fn fetch(&self) -> Result<String> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx).cloned().flatten() {
                Some(text) => Ok(text),
                None => Err(DashboardError::Transport("offline".to_string())),
            }
        }
    }

    fn log_with_rows(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    fn session(source: impl LogSource + 'static) -> DashboardSession {
        DashboardSession::new(Box::new(source), ParseOptions::default())
    }

    // ── snapshot basics ───────────────────────────────────────────────────

    #[test]
    fn test_initial_snapshot_is_empty() {
        let s = session(ScriptedSource::new(vec![]));
        let snap = s.snapshot();
        assert!(snap.is_empty());
        assert_eq!(snap.stats, SummaryStatistics::default());
        assert!(snap.warning.is_none());
        assert!(snap.fetch_error.is_none());
    }

    #[test]
    fn test_recent_visits_newest_first() {
        let records: Vec<VisitorRecord> = (1..=5)
            .map(|i| VisitorRecord {
                timestamp: format!("t{i}"),
                party_size: i,
                ..Default::default()
            })
            .collect();
        let snap = DashboardSnapshot::from_records(records, DataOrigin::Source, None);

        let recent: Vec<_> = snap.recent_visits(3).iter().map(|r| r.timestamp.clone()).collect();
        assert_eq!(recent, vec!["t5", "t4", "t3"]);
        assert_eq!(snap.recent_visits(10).len(), 5);

        assert_eq!(snap.recent_party_sizes(2), vec![4, 5]);
        assert_eq!(snap.recent_party_sizes(10), vec![1, 2, 3, 4, 5]);
        assert!(snap.recent_party_sizes(0).is_empty());
    }

    // ── reload ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_reload_uses_source_rows() {
        let text = log_with_rows(&[
            "t1,Perorangan,Budi,25,L,Guru,,,Coblong,,,,,,1,1,0,",
            "t2,Rombongan,,,,,,,Lembang,Bu Ani,,SDN 1,,,30,15,15,Anak",
        ]);
        let mut s = session(ScriptedSource::new(vec![Some(&text)]));

        let snap = s.reload().await;
        assert_eq!(snap.origin, DataOrigin::Source);
        assert!(snap.warning.is_none());
        assert_eq!(snap.records.len(), 2);
        assert_eq!(snap.stats.total, 31);
        assert_eq!(snap.stats.child, 30);
        assert!(Arc::ptr_eq(&snap, &s.snapshot()));
    }

    #[tokio::test]
    async fn test_reload_fetch_failure_uses_fallback() {
        let mut s = session(ScriptedSource::new(vec![None]));

        let snap = s.reload().await;
        assert_eq!(snap.origin, DataOrigin::Fallback);
        assert_eq!(snap.warning.as_deref(), Some(FETCH_FAILED_WARNING));
        assert_eq!(snap.records, fallback_records());
        assert_eq!(snap.stats, aggregate(&fallback_records()));
        assert!(snap.fetch_error.as_deref().unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn test_reload_empty_log_uses_fallback() {
        let mut s = session(ScriptedSource::new(vec![Some(HEADER)]));

        let snap = s.reload().await;
        assert_eq!(snap.origin, DataOrigin::Fallback);
        assert_eq!(snap.warning.as_deref(), Some(EMPTY_SOURCE_WARNING));
        assert!(snap.fetch_error.is_none());
    }

    #[tokio::test]
    async fn test_reload_replaces_snapshot_wholesale() {
        let first = log_with_rows(&["t1,Perorangan,A,20,L,,,,,,,,,,1,1,0,"]);
        let second = log_with_rows(&[
            "t2,Perorangan,B,30,P,,,,,,,,,,1,0,1,",
            "t3,Perorangan,C,40,P,,,,,,,,,,1,0,1,",
        ]);
        let mut s = session(ScriptedSource::new(vec![Some(&first), Some(&second)]));

        let old = s.reload().await;
        let new = s.reload().await;

        // The earlier snapshot is untouched by the reload.
        assert_eq!(old.records.len(), 1);
        assert_eq!(new.records.len(), 2);
        assert_eq!(new.recent_visits(1)[0].name.as_deref(), Some("C"));
        assert_eq!(new.recent_party_sizes(5), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_reload_recovers_after_failure() {
        let text = log_with_rows(&["t1,Perorangan,A,20,L,,,,,,,,,,1,1,0,"]);
        let mut s = session(ScriptedSource::new(vec![None, Some(&text)]));

        assert_eq!(s.reload().await.origin, DataOrigin::Fallback);
        let snap = s.reload().await;
        assert_eq!(snap.origin, DataOrigin::Source);
        assert!(snap.warning.is_none());
        assert!(snap.fetch_error.is_none());
    }

    // ── with real sources ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_reload_from_file_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("buku_tamu.csv");
        std::fs::write(
            &path,
            log_with_rows(&["t1,Perorangan,A,70,P,Pensiunan,,,Cidadap,,,,,,1,0,1,"]),
        )
        .unwrap();

        let mut s = session(FileLogSource::new(&path));
        let snap = s.reload().await;
        assert_eq!(snap.origin, DataOrigin::Source);
        assert_eq!(snap.stats.senior, 1);
        assert_eq!(s.source_description(), path.display().to_string());
    }

    #[tokio::test]
    async fn test_reload_http_error_status_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = HttpLogSource::new(format!("{}/log.csv", server.uri())).unwrap();
        let mut s = session(source);
        let snap = s.reload().await;
        assert_eq!(snap.origin, DataOrigin::Fallback);
        assert_eq!(snap.warning.as_deref(), Some(FETCH_FAILED_WARNING));
        assert!(snap.fetch_error.as_deref().unwrap().contains("500"));
    }
}
