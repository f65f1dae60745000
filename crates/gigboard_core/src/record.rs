use std::collections::HashSet;

use chrono::NaiveDate;

/// Identifier of a job row as issued by the remote table.
pub type JobId = String;

const SHORT_ID_LEN: usize = 6;

/// One job row after it has been coerced at the fetch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRecord {
    pub id: JobId,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub rate: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub posted_date: Option<NaiveDate>,
}

impl JobRecord {
    pub fn new(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Trailing characters of the id, as printed on job cards.
    pub fn short_id(&self) -> &str {
        let count = self.id.chars().count();
        if count <= SHORT_ID_LEN {
            return &self.id;
        }
        let skip = count - SHORT_ID_LEN;
        let start = self
            .id
            .char_indices()
            .nth(skip)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.id[start..]
    }

    /// The searchable fields, in the order the matchers consult them.
    pub(crate) fn search_fields(&self) -> [Option<&str>; 3] {
        [
            self.title.as_deref(),
            self.company.as_deref(),
            self.location.as_deref(),
        ]
    }
}

/// Accumulated job rows for the current session, in fetch order.
///
/// Ids are unique: rows whose id is already stored are dropped on insert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordStore {
    records: Vec<JobRecord>,
    ids: HashSet<JobId>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.ids.clear();
    }

    /// Replaces the contents with `records`. Returns how many duplicates were skipped.
    pub fn replace(&mut self, records: Vec<JobRecord>) -> usize {
        self.clear();
        self.append(records)
    }

    /// Appends `records` after the existing rows. Returns how many duplicates were skipped.
    pub fn append(&mut self, records: Vec<JobRecord>) -> usize {
        let mut skipped = 0;
        for record in records {
            if self.ids.insert(record.id.clone()) {
                self.records.push(record);
            } else {
                skipped += 1;
            }
        }
        skipped
    }
}
