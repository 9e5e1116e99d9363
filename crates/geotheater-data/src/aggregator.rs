//! Folding visitor records into [`SummaryStatistics`].

use geotheater_core::models::{
    AgeBucket, SummaryStatistics, VisitKind, VisitorRecord, INSTITUTION_SCHOOL, OTHER_OCCUPATION,
    OUT_OF_AREA,
};
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Aggregate `records` in a single pass.
///
/// Deterministic and infallible: empty input yields all-zero statistics.
pub fn aggregate(records: &[VisitorRecord]) -> SummaryStatistics {
    let mut stats = SummaryStatistics::default();
    for record in records {
        accumulate(&mut stats, record);
    }
    debug!(
        "Aggregated {} records into {} visitors",
        records.len(),
        stats.total
    );
    stats
}

/// Aggregate `records` in independent shards of `shard_len` and merge them.
///
/// The result is identical to [`aggregate`]. A `shard_len` of zero is treated
/// as one shard.
pub fn aggregate_sharded(records: &[VisitorRecord], shard_len: usize) -> SummaryStatistics {
    if shard_len == 0 {
        return aggregate(records);
    }
    records
        .chunks(shard_len)
        .map(aggregate)
        .fold(SummaryStatistics::default(), |mut acc, shard| {
            acc.merge(&shard);
            acc
        })
}

/// Add one record's contribution to `stats`.
pub fn accumulate(stats: &mut SummaryStatistics, record: &VisitorRecord) {
    let persons = u64::from(record.party_size);

    stats.total += persons;
    stats.total_male += u64::from(record.male_count);
    stats.total_female += u64::from(record.female_count);

    match record.visit_kind {
        VisitKind::Individual => stats.individual_visits += 1,
        VisitKind::Group => stats.group_visits += 1,
    }

    *stats
        .subdistricts
        .entry(subdistrict_key(record).to_string())
        .or_insert(0) += persons;
    *stats
        .occupations
        .entry(occupation_key(record).to_string())
        .or_insert(0) += persons;

    if let Some((bucket, amount)) = age_contribution(record) {
        stats.add_to_bucket(bucket, amount);
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn subdistrict_key(record: &VisitorRecord) -> &str {
    record
        .subdistrict
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(OUT_OF_AREA)
}

fn occupation_key(record: &VisitorRecord) -> &str {
    if let Some(occupation) = record.occupation.as_deref().filter(|s| !s.is_empty()) {
        occupation
    } else if record.institution.as_deref().is_some_and(|s| !s.is_empty()) {
        INSTITUTION_SCHOOL
    } else {
        OTHER_OCCUPATION
    }
}

/// Bucket and increment for a record's age information.
///
/// A numeric age counts the entry once. A range label counts the whole
/// party; labels matching no bucket land in Adult.
fn age_contribution(record: &VisitorRecord) -> Option<(AgeBucket, u64)> {
    if let Some(age) = record.age {
        return Some((AgeBucket::for_age(age), 1));
    }
    let label = record.age_range_label.as_deref().filter(|l| !l.is_empty())?;
    let bucket = AgeBucket::match_label(label).unwrap_or(AgeBucket::Adult);
    Some((bucket, u64::from(record.party_size)))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
