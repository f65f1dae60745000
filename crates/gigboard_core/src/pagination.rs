/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// One bounded read of the remote table, tagged with the session it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub epoch: u64,
    pub page_index: u32,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Idle,
    Loading {
        page_index: u32,
    },
}

/// Rows delivered for one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub records: Vec<crate::JobRecord>,
    /// Rows the table returned, including any rejected during coercion.
    pub rows_received: usize,
}

impl LoadedPage {
    pub fn new(records: Vec<crate::JobRecord>) -> Self {
        Self {
            rows_received: records.len(),
            records,
        }
    }
}

/// How a completed page should be merged into the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMerge {
    Replace,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    next_page: u32,
    has_more: bool,
    status: PageStatus,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            next_page: 0,
            has_more: true,
            status: PageStatus::Idle,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, PageStatus::Loading { .. })
    }

    /// Forgets all progress, including any fetch in flight.
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }

    /// Starts loading page 0. Refused while another fetch is in flight.
    pub fn request_first(&mut self, epoch: u64) -> Option<PageRequest> {
        if self.is_loading() {
            return None;
        }
        Some(self.begin(0, epoch))
    }

    /// Starts loading the next page. Refused while loading or once the table is exhausted.
    pub fn request_next(&mut self, epoch: u64) -> Option<PageRequest> {
        if self.is_loading() || !self.has_more {
            return None;
        }
        Some(self.begin(self.next_page, epoch))
    }

    /// Whether a completion for `page_index` is the one currently awaited.
    pub fn is_awaiting(&self, page_index: u32) -> bool {
        self.status == PageStatus::Loading { page_index }
    }

    /// Records a successful fetch of `received` rows for the awaited page.
    pub fn complete(&mut self, page_index: u32, received: usize) -> PageMerge {
        self.status = PageStatus::Idle;
        self.next_page = page_index + 1;
        self.has_more = received >= self.page_size;
        if page_index == 0 {
            PageMerge::Replace
        } else {
            PageMerge::Append
        }
    }

    /// A failed fetch leaves `has_more` and the page cursor untouched.
    pub fn fail(&mut self) {
        self.status = PageStatus::Idle;
    }

    fn begin(&mut self, page_index: u32, epoch: u64) -> PageRequest {
        self.status = PageStatus::Loading { page_index };
        PageRequest {
            epoch,
            page_index,
            offset: page_index as usize * self.page_size,
            limit: self.page_size,
        }
    }
}
