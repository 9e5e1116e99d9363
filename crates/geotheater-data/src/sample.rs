//! Built-in sample log shown when the real source is unavailable.

use geotheater_core::models::{Sex, VisitKind, VisitorRecord};

/// Warning attached to a snapshot when the source could not be fetched.
pub const FETCH_FAILED_WARNING: &str = "Sync failed. Showing local sample data.";

/// Warning attached to a snapshot when the source had no data rows.
pub const EMPTY_SOURCE_WARNING: &str = "Data source returned no rows. Showing local sample data.";

/// The fixed fallback record sequence.
pub fn fallback_records() -> Vec<VisitorRecord> {
    vec![VisitorRecord {
        timestamp: "2026-02-01 08:30".to_string(),
        visit_kind: VisitKind::Individual,
        name: Some("Budi Utomo".to_string()),
        age: Some(25),
        sex: Some(Sex::Male),
        occupation: Some("Mahasiswa".to_string()),
        subdistrict: Some("Coblong".to_string()),
        party_size: 1,
        male_count: 1,
        female_count: 0,
        age_range_label: Some("Dewasa".to_string()),
        ..Default::default()
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::aggregate;
    use crate::parser::{parse_records, ParseOptions};

    #[test]
    fn test_fallback_is_non_empty_and_stable() {
        let a = fallback_records();
        assert!(!a.is_empty());
        assert_eq!(a, fallback_records());
    }

    #[test]
    fn test_fallback_matches_parsed_reference_row() {
        let text = "header\n\"2026-02-01 08:30\",Perorangan,Budi Utomo,25,L,Mahasiswa,,,Coblong,,,,,,1,1,0,Dewasa\n";
        assert_eq!(parse_records(text, ParseOptions::default()), fallback_records());
    }

    #[test]
    fn test_fallback_aggregate() {
        let stats = aggregate(&fallback_records());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.total_male, 1);
        assert_eq!(stats.adult, 1);
        assert_eq!(stats.subdistricts.get("Coblong"), Some(&1));
    }
}
