use crate::fuzzy::{FuzzyMatcher, DEFAULT_THRESHOLD};
use crate::JobRecord;

/// The only `location` value the remote filter treats as remote work.
pub const REMOTE_LOCATION: &str = "Remote";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationCategory {
    #[default]
    All,
    Remote,
    Onsite,
}

impl LocationCategory {
    pub fn admits(self, record: &JobRecord) -> bool {
        let is_remote = record.location.as_deref() == Some(REMOTE_LOCATION);
        match self {
            LocationCategory::All => true,
            LocationCategory::Remote => is_remote,
            LocationCategory::Onsite => !is_remote,
        }
    }
}

/// How committed pills are matched against title, company and location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMode {
    /// Any pill is a case-insensitive substring of a searchable field.
    Substring,
    /// All pills, joined by spaces, fuzzily match a searchable field.
    Fuzzy { threshold: f64 },
}

impl Default for MatchMode {
    fn default() -> Self {
        MatchMode::Fuzzy {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// User-controlled search state: committed pills, the search box draft and
/// the location category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pills: Vec<String>,
    draft: String,
    location: LocationCategory,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pills(&self) -> &[String] {
        &self.pills
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn location(&self) -> LocationCategory {
        self.location
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn set_location(&mut self, location: LocationCategory) -> bool {
        let changed = self.location != location;
        self.location = location;
        changed
    }

    /// Normalizes `raw` and adds it as a pill. Returns false for blank or repeated terms.
    pub fn add_pill(&mut self, raw: &str) -> bool {
        let term = normalize_term(raw);
        if term.is_empty() || self.pills.contains(&term) {
            return false;
        }
        self.pills.push(term);
        true
    }

    pub fn remove_pill(&mut self, pill: &str) -> bool {
        let before = self.pills.len();
        self.pills.retain(|existing| existing != pill);
        self.pills.len() != before
    }

    /// Turns the draft into a pill. The draft is cleared either way.
    pub fn commit_draft(&mut self) -> bool {
        let draft = std::mem::take(&mut self.draft);
        self.add_pill(&draft)
    }

    pub fn visible<'a>(&self, records: &'a [JobRecord], mode: MatchMode) -> Vec<&'a JobRecord> {
        visible_jobs(records, &self.pills, self.location, mode)
    }
}

pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Text pass followed by the location pass.
pub fn visible_jobs<'a>(
    records: &'a [JobRecord],
    pills: &[String],
    location: LocationCategory,
    mode: MatchMode,
) -> Vec<&'a JobRecord> {
    let matched = match mode {
        MatchMode::Substring => substring_matches(records, pills),
        MatchMode::Fuzzy { threshold } => fuzzy_matches(records, pills, threshold),
    };
    matched
        .into_iter()
        .filter(|record| location.admits(record))
        .collect()
}

fn substring_matches<'a>(records: &'a [JobRecord], pills: &[String]) -> Vec<&'a JobRecord> {
    if pills.is_empty() {
        return records.iter().collect();
    }
    let pills: Vec<String> = pills.iter().map(|pill| pill.to_lowercase()).collect();
    records
        .iter()
        .filter(|record| {
            let fields: Vec<String> = record
                .search_fields()
                .into_iter()
                .map(|field| field.unwrap_or_default().to_lowercase())
                .collect();
            pills
                .iter()
                .any(|pill| fields.iter().any(|field| field.contains(pill.as_str())))
        })
        .collect()
}

fn fuzzy_matches<'a>(
    records: &'a [JobRecord],
    pills: &[String],
    threshold: f64,
) -> Vec<&'a JobRecord> {
    if pills.is_empty() {
        return records.iter().collect();
    }
    let query = pills.join(" ");
    FuzzyMatcher::new(threshold)
        .search(&query, records)
        .into_iter()
        .map(|hit| hit.record)
        .collect()
}
