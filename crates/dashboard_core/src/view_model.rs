use crate::{
    CrawlStatus, HeadingRecord, LinkRecord, Notice, ResultId, ResultItem, ResultPage, ResultQuery,
};

/// Read-only snapshot of the synchronizer state handed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncView {
    pub page: ResultPage,
    pub query: ResultQuery,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub is_polling: bool,
    pub notice: Option<Notice>,
}

impl SyncView {
    pub fn items(&self) -> &[ResultItem] {
        &self.page.items
    }

    /// Number of items on the current page per status, in `CrawlStatus::ALL` order.
    pub fn status_counts(&self) -> Vec<(CrawlStatus, usize)> {
        CrawlStatus::ALL
            .iter()
            .map(|status| {
                let count = self
                    .page
                    .items
                    .iter()
                    .filter(|item| item.status() == *status)
                    .count();
                (*status, count)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailView {
    pub target_id: Option<ResultId>,
    pub meta: Option<ResultItem>,
    pub links: Vec<LinkRecord>,
    pub headings: Vec<HeadingRecord>,
    pub is_loading: bool,
    /// Set when one or more facets failed and were shown empty.
    pub diagnostic: Option<String>,
}

impl DetailView {
    pub fn is_open(&self) -> bool {
        self.target_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCodeClass {
    Success,
    Error,
    Unknown,
}

impl StatusCodeClass {
    pub fn classify(status_code: Option<u16>) -> Self {
        match status_code {
            None => StatusCodeClass::Unknown,
            Some(code) if (200..400).contains(&code) => StatusCodeClass::Success,
            Some(_) => StatusCodeClass::Error,
        }
    }
}

pub fn accessibility_text(is_accessible: bool) -> &'static str {
    if is_accessible {
        "Yes"
    } else {
        "No"
    }
}
