use std::fmt;

use crate::CrawlStatus;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one results-page request. The last one used is replayed by
/// poll ticks and by refreshes that follow a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub status: Option<CrawlStatus>,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for ResultQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ResultQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            search: None,
            status: None,
            sort_by: "created_at".to_string(),
            sort_order: SortOrder::Desc,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn status(mut self, status: CrawlStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = field.into();
        self.sort_order = order;
        self
    }

    /// Query-string pairs in a stable order. Empty values are omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if !self.sort_by.is_empty() {
            pairs.push(("sort_by", self.sort_by.clone()));
        }
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));
        pairs
    }
}
