use crate::view_model::SyncView;
use crate::{RequestId, ResultPage, ResultQuery, SyncError};

pub const URL_REQUIRED: &str = "URL is required";
pub const URLS_REQUIRED: &str = "at least one URL is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Last user-facing outcome message, tagged explicitly rather than inferred
/// from its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            text: text.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}

/// Trim a submitted URL, rejecting empty input.
pub fn validate_submission(raw: &str) -> Result<String, SyncError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SyncError::validation(URL_REQUIRED));
    }
    Ok(trimmed.to_string())
}

/// Trim a batch of URLs for bulk actions, dropping blank entries.
pub fn validate_url_batch<I, S>(raw: I) -> Result<Vec<String>, SyncError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let urls: Vec<String> = raw
        .into_iter()
        .map(|url| url.as_ref().trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();
    if urls.is_empty() {
        return Err(SyncError::validation(URLS_REQUIRED));
    }
    Ok(urls)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncState {
    page: ResultPage,
    last_query: ResultQuery,
    in_flight: usize,
    last_request: RequestId,
    committed_request: RequestId,
    last_error: Option<String>,
    notice: Option<Notice>,
    mutating: bool,
    polling: bool,
    shut_down: bool,
    dirty: bool,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a caller-chosen query; poll ticks replay it until the next refresh.
    pub fn with_query(query: ResultQuery) -> Self {
        Self {
            last_query: query,
            ..Self::default()
        }
    }

    pub fn view(&self) -> SyncView {
        SyncView {
            page: self.page.clone(),
            query: self.last_query.clone(),
            is_loading: self.is_loading(),
            last_error: self.last_error.clone(),
            is_polling: self.polling,
            notice: self.notice.clone(),
        }
    }

    pub fn page(&self) -> &ResultPage {
        &self.page
    }

    pub fn last_query(&self) -> &ResultQuery {
        &self.last_query
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0 || self.mutating
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns whether anything observable changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_query(&mut self, query: ResultQuery) {
        self.last_query = query;
    }

    /// Allocate a request id for a fetch of the last-used query.
    pub(crate) fn begin_fetch(&mut self) -> RequestId {
        self.last_request += 1;
        self.in_flight += 1;
        self.last_error = None;
        self.dirty = true;
        self.last_request
    }

    pub(crate) fn finish_fetch(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dirty = true;
    }

    /// A response is stale once a newer request has already been committed.
    pub fn is_stale(&self, request: RequestId) -> bool {
        request <= self.committed_request
    }

    pub(crate) fn commit_page(&mut self, request: RequestId, page: ResultPage) {
        self.page = page;
        self.committed_request = request;
        self.last_error = None;
        self.dirty = true;
    }

    pub(crate) fn record_error(&mut self, error: &SyncError) {
        self.last_error = Some(error.to_string());
        self.dirty = true;
    }

    pub(crate) fn set_mutating(&mut self, mutating: bool) {
        self.mutating = mutating;
        if mutating {
            self.last_error = None;
        }
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    /// Returns true when the flag actually changed.
    pub(crate) fn set_polling(&mut self, polling: bool) -> bool {
        if self.polling == polling {
            return false;
        }
        self.polling = polling;
        self.dirty = true;
        true
    }

    pub(crate) fn shut_down(&mut self) {
        self.shut_down = true;
        self.polling = false;
        self.dirty = true;
    }
}
