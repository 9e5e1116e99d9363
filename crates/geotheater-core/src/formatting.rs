use std::fmt::Write as _;

use crate::models::{InsightReport, SummaryStatistics};

/// Format a visitor count with thousands separators.
///
/// # Examples
///
/// ```
/// use geotheater_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use geotheater_core::formatting::percentage;
///
/// assert!((percentage(50, 200, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0, 0, 2), 0.0);
/// ```
pub fn percentage(part: u64, whole: u64, decimal_places: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64 / whole as f64) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Plain-text rendition of the statistics for non-interactive output.
///
/// `warning` is printed first when present; `insight` is appended when
/// available.
pub fn plain_summary(
    stats: &SummaryStatistics,
    warning: Option<&str>,
    insight: Option<&InsightReport>,
) -> String {
    let mut out = String::new();

    if let Some(w) = warning {
        let _ = writeln!(out, "! {w}");
        out.push('\n');
    }

    let _ = writeln!(out, "Total visitors    {}", format_count(stats.total));
    let _ = writeln!(out, "Male              {}", format_count(stats.total_male));
    let _ = writeln!(out, "Female            {}", format_count(stats.total_female));
    let _ = writeln!(
        out,
        "Visits            {} individual, {} group",
        format_count(stats.individual_visits),
        format_count(stats.group_visits)
    );

    out.push_str("\nAge distribution\n");
    for (bucket, count) in stats.age_distribution() {
        let _ = writeln!(out, "  {:<8} {}", bucket.label(), format_count(count));
    }

    out.push_str("\nTop occupations / sectors\n");
    for (name, count) in stats.top_occupations(5) {
        let _ = writeln!(
            out,
            "  {:<24} {:>6}  {:>5.1}%",
            name,
            format_count(count),
            percentage(count, stats.total, 1)
        );
    }

    out.push_str("\nTop subdistricts of origin\n");
    for (name, count) in stats.top_subdistricts(5) {
        let _ = writeln!(out, "  {:<24} {:>6} visitors", name, format_count(count));
    }

    if let Some(report) = insight {
        let _ = writeln!(out, "\nInsight [{}]", report.trending_status.as_str());
        let _ = writeln!(out, "  {}", report.summary);
        for rec in &report.recommendations {
            let _ = writeln!(out, "  - {rec}");
        }
    }

    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrendingStatus;

    // ── format_count ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_thousands() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    // ── percentage ───────────────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        let p = percentage(50, 200, 1);
        assert!((p - 25.0).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10, 0, 2), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1, 3, 2);
        assert!((p - 33.33).abs() < 1e-9, "percentage = {p}");
    }

    // ── plain_summary ────────────────────────────────────────────────────────

    fn sample_stats() -> SummaryStatistics {
        let mut stats = SummaryStatistics {
            total: 1_250,
            total_male: 600,
            total_female: 640,
            child: 3,
            teen: 400,
            adult: 12,
            senior: 1,
            individual_visits: 14,
            group_visits: 9,
            ..Default::default()
        };
        stats.subdistricts.insert("Coblong".to_string(), 900);
        stats.subdistricts.insert("Lembang".to_string(), 350);
        stats.occupations.insert("Pelajar".to_string(), 1_000);
        stats.occupations.insert("Other".to_string(), 250);
        stats
    }

    #[test]
    fn test_plain_summary_contains_totals_and_tables() {
        let text = plain_summary(&sample_stats(), None, None);
        assert!(text.contains("Total visitors    1,250"), "{text}");
        assert!(text.contains("14 individual, 9 group"), "{text}");
        assert!(text.contains("Teen"), "{text}");
        assert!(text.contains("Pelajar"), "{text}");
        assert!(text.contains("80.0%"), "{text}");
        assert!(text.contains("Coblong"), "{text}");
        assert!(!text.starts_with('!'));
    }

    #[test]
    fn test_plain_summary_warning_first() {
        let text = plain_summary(&sample_stats(), Some("Sync failed"), None);
        assert!(text.starts_with("! Sync failed"));
    }

    #[test]
    fn test_plain_summary_with_insight() {
        let report = InsightReport {
            summary: "School groups dominate".to_string(),
            recommendations: vec!["Book more guides".to_string()],
            trending_status: TrendingStatus::Up,
        };
        let text = plain_summary(&sample_stats(), None, Some(&report));
        assert!(text.contains("Insight [up]"));
        assert!(text.contains("  - Book more guides"));
    }
}
