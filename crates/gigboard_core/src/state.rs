use crate::view_model::{AppViewModel, AuthFormView, JobCardView, Screen};
use crate::{
    AuthForm, FilterState, JobRecord, LoadedPage, MatchMode, PageMerge, Pagination, RecordStore,
    Session, DEFAULT_PAGE_SIZE,
};

/// Knobs fixed at start-up by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSettings {
    pub page_size: usize,
    pub match_mode: MatchMode,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            match_mode: MatchMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    match_mode: MatchMode,
    session: Session,
    auth: AuthForm,
    store: RecordStore,
    filter: FilterState,
    pagination: Pagination,
    last_error: Option<String>,
    skipped_duplicates: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BoardSettings) -> Self {
        Self {
            match_mode: settings.match_mode,
            pagination: Pagination::new(settings.page_size),
            ..Self::default()
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn records(&self) -> &[JobRecord] {
        self.store.records()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Rows dropped because their id was already in the store.
    pub fn skipped_duplicates(&self) -> usize {
        self.skipped_duplicates
    }

    /// The filtered, ordered subset the board should display.
    pub fn visible_jobs(&self) -> Vec<&JobRecord> {
        self.filter.visible(self.store.records(), self.match_mode)
    }

    pub fn view(&self) -> AppViewModel {
        let screen = if self.auth.recovering {
            Screen::SetPassword
        } else if self.session.is_signed_in() {
            Screen::Board
        } else {
            Screen::SignedOut
        };
        let jobs: Vec<JobCardView> = self
            .visible_jobs()
            .into_iter()
            .map(JobCardView::from_record)
            .collect();

        AppViewModel {
            screen,
            auth: AuthFormView {
                mode: self.auth.mode,
                email: self.auth.email.clone(),
                busy: self.auth.pending.is_some(),
                message: self.auth.message.clone(),
            },
            user_email: self.session.user().and_then(|user| user.email.clone()),
            pills: self.filter.pills().to_vec(),
            draft: self.filter.draft().to_string(),
            location: self.filter.location(),
            match_mode: self.match_mode,
            visible_count: jobs.len(),
            jobs,
            loaded_count: self.store.len(),
            loading: self.pagination.is_loading(),
            has_more: self.pagination.has_more(),
            last_error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn auth_mut(&mut self) -> &mut AuthForm {
        &mut self.auth
    }

    pub(crate) fn auth(&self) -> &AuthForm {
        &self.auth
    }

    pub(crate) fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub(crate) fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    pub(crate) fn set_match_mode(&mut self, mode: MatchMode) -> bool {
        let changed = self.match_mode != mode;
        self.match_mode = mode;
        changed
    }

    pub(crate) fn set_last_error(&mut self, error: Option<String>) {
        self.last_error = error;
    }

    /// Applies an identity change. Any change wipes records, filters and paging.
    pub(crate) fn change_identity(&mut self, user: Option<crate::User>) -> bool {
        if !self.session.set_user(user) {
            return false;
        }
        self.store.clear();
        self.filter = FilterState::new();
        self.pagination.reset();
        self.last_error = None;
        self.skipped_duplicates = 0;
        self.auth.reset_secrets();
        true
    }

    pub(crate) fn merge_page(&mut self, page_index: u32, page: LoadedPage) -> usize {
        let LoadedPage {
            records,
            rows_received,
        } = page;
        let merge = self.pagination.complete(page_index, rows_received);
        let skipped = match merge {
            PageMerge::Replace => self.store.replace(records),
            PageMerge::Append => self.store.append(records),
        };
        self.skipped_duplicates += skipped;
        self.last_error = None;
        skipped
    }
}
