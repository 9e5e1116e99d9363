use geotheater_core::formatting::plain_summary;
use geotheater_runtime::insights::InsightService;
use geotheater_runtime::session::DashboardSnapshot;

/// Text printed by `--view summary`.
///
/// The insight section is always present; without a configured provider it
/// carries the fallback report, as the dashboard does.
pub async fn summary_text(snapshot: &DashboardSnapshot, insights: &InsightService) -> String {
    let report = insights.insights_or_fallback(&snapshot.stats).await;
    plain_summary(&snapshot.stats, snapshot.warning.as_deref(), Some(&report))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use geotheater_data::sample::{fallback_records, FETCH_FAILED_WARNING};
    use geotheater_runtime::insights::fallback_report;
    use geotheater_runtime::session::DataOrigin;

    #[tokio::test]
    async fn test_summary_without_provider_includes_fallback_report() {
        let snapshot =
            DashboardSnapshot::from_records(fallback_records(), DataOrigin::Source, None);
        let text = summary_text(&snapshot, &InsightService::disabled()).await;

        let fallback = fallback_report();
        assert!(text.contains("Insight [stable]"), "{text}");
        assert!(text.contains(&fallback.summary), "{text}");
        for rec in &fallback.recommendations {
            assert!(text.contains(rec.as_str()), "{text}");
        }
        assert!(text.starts_with("Total visitors"), "{text}");
    }

    #[tokio::test]
    async fn test_summary_keeps_warning_first() {
        let snapshot = DashboardSnapshot::from_records(
            fallback_records(),
            DataOrigin::Fallback,
            Some(FETCH_FAILED_WARNING.to_string()),
        );
        let text = summary_text(&snapshot, &InsightService::disabled()).await;
        assert!(text.starts_with(&format!("! {FETCH_FAILED_WARNING}")), "{text}");
        assert!(text.contains("Insight [stable]"));
    }
}
