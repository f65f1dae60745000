use url::Url;

use crate::{AuthMessage, AuthMode, JobRecord, LocationCategory, MatchMode};

/// Placeholder shown when a row carries no posting date.
pub const MISSING_DATE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    SignedOut,
    /// Recovery link opened: the user must pick a new password.
    SetPassword,
    Board,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthFormView {
    pub mode: AuthMode,
    pub email: String,
    pub busy: bool,
    pub message: Option<AuthMessage>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub auth: AuthFormView,
    pub user_email: Option<String>,
    pub pills: Vec<String>,
    pub draft: String,
    pub location: LocationCategory,
    pub match_mode: MatchMode,
    pub jobs: Vec<JobCardView>,
    pub visible_count: usize,
    pub loaded_count: usize,
    pub loading: bool,
    pub has_more: bool,
    pub last_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCardView {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub rate: String,
    pub posted: String,
    pub summary: String,
    /// Only set for absolute http(s) links.
    pub link: Option<String>,
}

impl JobCardView {
    pub fn from_record(record: &JobRecord) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            id: record.id.clone(),
            short_id: record.short_id().to_string(),
            title: text(&record.title),
            company: text(&record.company),
            location: text(&record.location),
            rate: text(&record.rate),
            posted: record
                .posted_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| MISSING_DATE.to_string()),
            summary: text(&record.summary),
            link: record.url.as_deref().and_then(web_link),
        }
    }
}

fn web_link(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}
