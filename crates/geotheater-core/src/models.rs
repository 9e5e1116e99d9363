use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Subdistrict key used when a record carries no subdistrict.
pub const OUT_OF_AREA: &str = "Out of Area";

/// Occupation key used when a record has no occupation but names an institution.
pub const INSTITUTION_SCHOOL: &str = "Institution/School";

/// Occupation key used when a record has neither occupation nor institution.
pub const OTHER_OCCUPATION: &str = "Other";

/// Whether a log entry covers a single visitor or an organised party.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitKind {
    /// One person visiting on their own ("Perorangan").
    #[default]
    Individual,
    /// An organised group ("Rombongan").
    Group,
}

impl VisitKind {
    /// Map the raw log value onto a visit kind.
    ///
    /// Only the exact value `"Rombongan"` denotes a group; everything else,
    /// including blanks, is an individual visit.
    pub fn from_raw(raw: &str) -> Self {
        if raw == "Rombongan" {
            VisitKind::Group
        } else {
            VisitKind::Individual
        }
    }

    /// Label shown in tables and charts.
    pub fn label(self) -> &'static str {
        match self {
            VisitKind::Individual => "Individual",
            VisitKind::Group => "Group",
        }
    }
}

/// Recorded sex of an individual visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Logged as `"L"` (laki-laki).
    Male,
    /// Logged as `"P"` (perempuan).
    Female,
}

impl Sex {
    /// Parse the single-letter log code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Sex::Male),
            "P" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Coarse life-stage category used for demographic reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBucket {
    /// Under 12.
    Child,
    /// 12 up to (not including) 18.
    Teen,
    /// 18 up to (not including) 60.
    Adult,
    /// 60 and over.
    Senior,
}

impl AgeBucket {
    /// All buckets in display order.
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::Child,
        AgeBucket::Teen,
        AgeBucket::Adult,
        AgeBucket::Senior,
    ];

    /// Bucket for a precise age in years.
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=11 => AgeBucket::Child,
            12..=17 => AgeBucket::Teen,
            18..=59 => AgeBucket::Adult,
            _ => AgeBucket::Senior,
        }
    }

    /// Match a free-text age-range label against the recognised tokens.
    ///
    /// The comparison is a case-insensitive substring match, checked in the
    /// order child, teen, adult, senior. Both the Indonesian tokens used by
    /// the visitor form and their English equivalents are accepted. Returns
    /// `None` when no token matches.
    pub fn match_label(label: &str) -> Option<Self> {
        const TOKENS: [(AgeBucket, [&str; 2]); 4] = [
            (AgeBucket::Child, ["anak", "child"]),
            (AgeBucket::Teen, ["remaja", "teen"]),
            (AgeBucket::Adult, ["dewasa", "adult"]),
            (AgeBucket::Senior, ["lansia", "senior"]),
        ];

        let lower = label.to_lowercase();
        TOKENS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(bucket, _)| *bucket)
    }

    /// Label shown in the age distribution chart.
    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Child => "Child",
            AgeBucket::Teen => "Teen",
            AgeBucket::Adult => "Adult",
            AgeBucket::Senior => "Senior",
        }
    }
}

/// Which numeric fields of a record fell back to their defaults while parsing.
///
/// Lets callers tell a genuine `0` apart from a value that failed to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultedFields {
    pub age: bool,
    pub party_size: bool,
    pub male_count: bool,
    pub female_count: bool,
}

impl DefaultedFields {
    /// `true` when any numeric field was defaulted.
    pub fn any(&self) -> bool {
        self.age || self.party_size || self.male_count || self.female_count
    }
}

/// One logged visit event.
///
/// Built once per parsed log row and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    /// Venue-local timestamp exactly as logged.
    pub timestamp: String,
    pub visit_kind: VisitKind,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub occupation: Option<String>,
    pub address: Option<String>,
    pub village: Option<String>,
    pub subdistrict: Option<String>,
    pub group_leader: Option<String>,
    pub institution: Option<String>,
    /// Number of persons covered by this entry (at least 1).
    pub party_size: u32,
    pub male_count: u32,
    pub female_count: u32,
    /// Free-text age bucket, consulted only when `age` is absent.
    pub age_range_label: Option<String>,
    #[serde(default)]
    pub defaulted: DefaultedFields,
}

impl Default for VisitorRecord {
    fn default() -> Self {
        Self {
            timestamp: String::new(),
            visit_kind: VisitKind::Individual,
            name: None,
            age: None,
            sex: None,
            occupation: None,
            address: None,
            village: None,
            subdistrict: None,
            group_leader: None,
            institution: None,
            party_size: 1,
            male_count: 0,
            female_count: 0,
            age_range_label: None,
            defaulted: DefaultedFields::default(),
        }
    }
}

impl VisitorRecord {
    /// Name shown in the visit log: the visitor, else the institution, else
    /// the group leader.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.institution.as_deref())
            .or(self.group_leader.as_deref())
            .unwrap_or("")
    }

    /// Secondary line in the visit log.
    pub fn display_detail(&self) -> &str {
        self.occupation.as_deref().unwrap_or("Registered group")
    }
}

/// Aggregate derived from a full sequence of [`VisitorRecord`]s.
///
/// Always recomputed from scratch. `total` need not equal
/// `total_male + total_female`, and the age buckets need not sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Sum of party sizes.
    pub total: u64,
    pub total_male: u64,
    pub total_female: u64,
    pub child: u64,
    pub teen: u64,
    pub adult: u64,
    pub senior: u64,
    /// Number of individual entries (not persons).
    pub individual_visits: u64,
    /// Number of group entries (not persons).
    pub group_visits: u64,
    /// Subdistrict of origin → visitor count.
    pub subdistricts: BTreeMap<String, u64>,
    /// Occupation or sector → visitor count.
    pub occupations: BTreeMap<String, u64>,
}

impl SummaryStatistics {
    /// Count held in `bucket`.
    pub fn bucket(&self, bucket: AgeBucket) -> u64 {
        match bucket {
            AgeBucket::Child => self.child,
            AgeBucket::Teen => self.teen,
            AgeBucket::Adult => self.adult,
            AgeBucket::Senior => self.senior,
        }
    }

    /// Add `amount` to the given age bucket.
    pub fn add_to_bucket(&mut self, bucket: AgeBucket, amount: u64) {
        let slot = match bucket {
            AgeBucket::Child => &mut self.child,
            AgeBucket::Teen => &mut self.teen,
            AgeBucket::Adult => &mut self.adult,
            AgeBucket::Senior => &mut self.senior,
        };
        *slot += amount;
    }

    /// `(bucket, count)` pairs in display order.
    pub fn age_distribution(&self) -> Vec<(AgeBucket, u64)> {
        AgeBucket::ALL.iter().map(|b| (*b, self.bucket(*b))).collect()
    }

    /// Number of log entries that contributed to this aggregate.
    pub fn visit_count(&self) -> u64 {
        self.individual_visits + self.group_visits
    }

    /// Fold a partial aggregate into this one.
    ///
    /// Counts add elementwise and the frequency tables are unioned with
    /// addition, so merging shard results equals aggregating the
    /// concatenated input.
    pub fn merge(&mut self, other: &SummaryStatistics) {
        self.total += other.total;
        self.total_male += other.total_male;
        self.total_female += other.total_female;
        self.child += other.child;
        self.teen += other.teen;
        self.adult += other.adult;
        self.senior += other.senior;
        self.individual_visits += other.individual_visits;
        self.group_visits += other.group_visits;
        for (key, count) in &other.subdistricts {
            *self.subdistricts.entry(key.clone()).or_insert(0) += count;
        }
        for (key, count) in &other.occupations {
            *self.occupations.entry(key.clone()).or_insert(0) += count;
        }
    }

    /// The `n` subdistricts with the most visitors.
    pub fn top_subdistricts(&self, n: usize) -> Vec<(String, u64)> {
        top_n(&self.subdistricts, n)
    }

    /// The `n` occupations / sectors with the most visitors.
    pub fn top_occupations(&self, n: usize) -> Vec<(String, u64)> {
        top_n(&self.occupations, n)
    }
}

/// Sort by count descending, ties broken by key ascending, and keep `n`.
fn top_n(table: &BTreeMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = table.iter().map(|(k, v)| (k.clone(), *v)).collect();
    // BTreeMap iteration is key-ordered, so a stable sort keeps ties by key.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

/// Direction of the visitor trend reported by the insight collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingStatus {
    Up,
    Down,
    Stable,
}

impl TrendingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendingStatus::Up => "up",
            TrendingStatus::Down => "down",
            TrendingStatus::Stable => "stable",
        }
    }
}

/// Narrative produced from aggregate statistics by the insight collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub trending_status: TrendingStatus,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
