//! Delimited visitor-log parsing for Geotheater.
//!
//! Turns the raw text of the guest-book export into [`VisitorRecord`]s.
//! Malformed numeric fields fall back to defaults instead of failing; the
//! [`DefaultedFields`] flags on each record say which ones did.

use std::str::FromStr;

use geotheater_core::error::DashboardError;
use geotheater_core::models::{DefaultedFields, Sex, VisitKind, VisitorRecord};
use tracing::debug;

/// Number of positional columns in a log row. Shorter rows are padded.
pub const FIELD_COUNT: usize = 18;

// Column positions (0-indexed). 10, 12 and 13 are unused.
const COL_TIMESTAMP: usize = 0;
const COL_VISIT_KIND: usize = 1;
const COL_NAME: usize = 2;
const COL_AGE: usize = 3;
const COL_SEX: usize = 4;
const COL_OCCUPATION: usize = 5;
const COL_ADDRESS: usize = 6;
const COL_VILLAGE: usize = 7;
const COL_SUBDISTRICT: usize = 8;
const COL_GROUP_LEADER: usize = 9;
const COL_INSTITUTION: usize = 11;
const COL_PARTY_SIZE: usize = 14;
const COL_MALE_COUNT: usize = 15;
const COL_FEMALE_COUNT: usize = 16;
const COL_AGE_RANGE: usize = 17;

// ── Options ───────────────────────────────────────────────────────────────────

/// Field separator of the visitor log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// `,` as used by the published spreadsheet export.
    #[default]
    Comma,
    /// `;` as produced by spreadsheet tools in comma-decimal locales.
    Semicolon,
    /// Pick from the header line: semicolon if it has more `;` than `,`.
    Auto,
}

impl Delimiter {
    /// Concrete separator for a file whose header line is `header`.
    pub fn resolve(self, header: &str) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Auto => {
                let semis = header.matches(';').count();
                let commas = header.matches(',').count();
                if semis > commas {
                    ';'
                } else {
                    ','
                }
            }
        }
    }
}

impl FromStr for Delimiter {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            "auto" => Ok(Delimiter::Auto),
            other => Err(DashboardError::Config(format!(
                "unknown delimiter '{other}' (expected comma, semicolon or auto)"
            ))),
        }
    }
}

/// Knobs for [`parse_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: Delimiter,
}

// ── Parse-with-fallback ───────────────────────────────────────────────────────

/// A parsed numeric field plus whether it had to fall back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedField<T> {
    pub value: T,
    pub defaulted: bool,
}

/// Leading run of ASCII digits in `raw` (after trimming) as a `u32`.
///
/// `"25 tahun"` yields 25. No digits, or a run too large for `u32`, yields
/// `None`.
pub fn leading_number(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    trimmed[..end].parse().ok()
}

/// Parse `raw` as a count, substituting `default` when it is not a number.
///
/// # Examples
///
/// ```
/// use geotheater_data::parser::parse_with_fallback;
///
/// let ok = parse_with_fallback("3", 1);
/// assert_eq!((ok.value, ok.defaulted), (3, false));
///
/// let bad = parse_with_fallback("banyak", 1);
/// assert_eq!((bad.value, bad.defaulted), (1, true));
/// ```
pub fn parse_with_fallback(raw: &str, default: u32) -> ParsedField<u32> {
    match leading_number(raw) {
        Some(value) => ParsedField {
            value,
            defaulted: false,
        },
        None => ParsedField {
            value: default,
            defaulted: true,
        },
    }
}

/// Parse an optional age. Blank input is simply absent; non-blank input that
/// is not a number is absent *and* flagged as defaulted.
fn parse_age(raw: &str) -> ParsedField<Option<u32>> {
    if raw.is_empty() {
        return ParsedField {
            value: None,
            defaulted: false,
        };
    }
    match leading_number(raw) {
        Some(age) => ParsedField {
            value: Some(age),
            defaulted: false,
        },
        None => ParsedField {
            value: None,
            defaulted: true,
        },
    }
}

/// Party size must be at least 1; a parsed `0` is treated like garbage.
fn parse_party_size(raw: &str) -> ParsedField<u32> {
    let parsed = parse_with_fallback(raw, 1);
    if parsed.value == 0 {
        ParsedField {
            value: 1,
            defaulted: true,
        }
    } else {
        parsed
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse the full text of a visitor log.
///
/// The first non-blank line is the header and is skipped. Every following
/// non-blank line produces exactly one record, in input order. Never fails;
/// an empty result means the log had no data rows.
pub fn parse_records(text: &str, options: ParseOptions) -> Vec<VisitorRecord> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header) = lines.next() else {
        debug!("Visitor log is empty");
        return Vec::new();
    };
    let delimiter = options.delimiter.resolve(header);

    let records: Vec<VisitorRecord> = lines.map(|line| parse_row(line, delimiter)).collect();

    let defaulted = records.iter().filter(|r| r.defaulted.any()).count();
    debug!(
        "Parsed {} records ({} with defaulted fields) using '{}' delimiter",
        records.len(),
        defaulted,
        delimiter
    );

    records
}

/// Parse one data row split on `delimiter`.
pub fn parse_row(line: &str, delimiter: char) -> VisitorRecord {
    let fields: Vec<String> = line.split(delimiter).map(clean_field).collect();
    let field = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or("");
    let text = |idx: usize| {
        let value = field(idx);
        (!value.is_empty()).then(|| value.to_string())
    };

    let sex = Sex::from_code(field(COL_SEX));
    let age = parse_age(field(COL_AGE));
    let party_size = parse_party_size(field(COL_PARTY_SIZE));
    let male_count = parse_with_fallback(
        field(COL_MALE_COUNT),
        u32::from(sex == Some(Sex::Male)),
    );
    let female_count = parse_with_fallback(
        field(COL_FEMALE_COUNT),
        u32::from(sex == Some(Sex::Female)),
    );

    VisitorRecord {
        timestamp: field(COL_TIMESTAMP).to_string(),
        visit_kind: VisitKind::from_raw(field(COL_VISIT_KIND)),
        name: text(COL_NAME),
        age: age.value,
        sex,
        occupation: text(COL_OCCUPATION),
        address: text(COL_ADDRESS),
        village: text(COL_VILLAGE),
        subdistrict: text(COL_SUBDISTRICT),
        group_leader: text(COL_GROUP_LEADER),
        institution: text(COL_INSTITUTION),
        party_size: party_size.value,
        male_count: male_count.value,
        female_count: female_count.value,
        age_range_label: text(COL_AGE_RANGE),
        defaulted: DefaultedFields {
            age: age.defaulted,
            party_size: party_size.defaulted,
            male_count: male_count.defaulted,
            female_count: female_count.defaulted,
        },
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Drop one surrounding pair of quote characters and trim whitespace.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
    unquoted.trim().to_string()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
