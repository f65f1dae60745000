use chrono::{DateTime, NaiveDate};
use gigboard_core::JobRecord;
use serde_json::Value;

/// Column names of the job table, mapped onto [`JobRecord`] fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub rate: String,
    pub posted_date: String,
    pub summary: String,
    pub url: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: "UNIQUE_ID".to_string(),
            title: "Title".to_string(),
            company: "Company".to_string(),
            location: "Location".to_string(),
            rate: "rate".to_string(),
            posted_date: "date".to_string(),
            summary: "Summary".to_string(),
            url: "URL".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("row is not a JSON object")]
    NotAnObject,
    #[error("row has no usable `{column}` value")]
    MissingId { column: String },
}

/// Validates one untyped table row and converts it into a [`JobRecord`].
///
/// Text columns tolerate null, missing, numeric and boolean values; blank
/// strings count as absent. Only the id is mandatory.
pub fn coerce_row(row: &Value, columns: &ColumnMap) -> Result<JobRecord, RowError> {
    let object = row.as_object().ok_or(RowError::NotAnObject)?;
    let text = |column: &str| object.get(column).and_then(scalar_text);

    let id = text(&columns.id).ok_or_else(|| RowError::MissingId {
        column: columns.id.clone(),
    })?;

    Ok(JobRecord {
        id,
        title: text(&columns.title),
        company: text(&columns.company),
        location: text(&columns.location),
        rate: text(&columns.rate),
        summary: text(&columns.summary),
        url: text(&columns.url),
        posted_date: text(&columns.posted_date).and_then(|raw| parse_date(&raw)),
    })
}

/// Coerces every row, returning the records and how many rows were rejected.
pub fn coerce_rows(rows: &[Value], columns: &ColumnMap) -> (Vec<JobRecord>, usize) {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = 0;
    for row in rows {
        match coerce_row(row, columns) {
            Ok(record) => records.push(record),
            Err(err) => {
                gigboard_logging::board_warn!("Skipping job row: {}", err);
                rejected += 1;
            }
        }
    }
    (records, rejected)
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Accepts plain `YYYY-MM-DD` dates and RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}
