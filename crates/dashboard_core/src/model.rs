use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::SyncError;

pub type ResultId = u64;

/// Lifecycle of a crawl job as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    Pending,
    Running,
    Done,
    Error,
    Stopped,
}

impl CrawlStatus {
    pub const ALL: [CrawlStatus; 5] = [
        CrawlStatus::Pending,
        CrawlStatus::Running,
        CrawlStatus::Done,
        CrawlStatus::Error,
        CrawlStatus::Stopped,
    ];

    /// True while the backend is still expected to make progress on the job.
    pub fn is_active(self) -> bool {
        matches!(self, CrawlStatus::Pending | CrawlStatus::Running)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrawlStatus::Pending => "pending",
            CrawlStatus::Running => "running",
            CrawlStatus::Done => "done",
            CrawlStatus::Error => "error",
            CrawlStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary fields the backend computes for a crawled page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub status: CrawlStatus,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub html_version: Option<String>,
    /// Heading level ("h1".."h6") to number of headings at that level.
    #[serde(default)]
    pub headings: BTreeMap<String, u32>,
    #[serde(default)]
    pub internal_links: u32,
    #[serde(default)]
    pub external_links: u32,
    #[serde(default)]
    pub inaccessible_links: u32,
    #[serde(default)]
    pub has_login_form: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub updated_at: Option<String>,
}

impl CrawlSummary {
    pub fn with_status(status: CrawlStatus) -> Self {
        Self {
            status,
            title: None,
            html_version: None,
            headings: BTreeMap::new(),
            internal_links: 0,
            external_links: 0,
            inaccessible_links: 0,
            has_login_form: false,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: ResultId,
    pub url: String,
    pub crawl_data: CrawlSummary,
}

impl ResultItem {
    pub fn new(id: ResultId, url: impl Into<String>, status: CrawlStatus) -> Self {
        Self {
            id,
            url: url.into(),
            crawl_data: CrawlSummary::with_status(status),
        }
    }

    pub fn status(&self) -> CrawlStatus {
        self.crawl_data.status
    }
}

/// One page of crawl results. Replaced wholesale on every committed refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "data", default)]
    pub items: Vec<ResultItem>,
    #[serde(default)]
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl Default for ResultPage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 10,
            total_pages: 0,
        }
    }
}

impl ResultPage {
    pub fn has_active_crawls(&self) -> bool {
        self.items.iter().any(|item| item.status().is_active())
    }

    /// Rejects a page holding more items than its own `page_size`.
    pub fn checked(self) -> Result<Self, SyncError> {
        if self.items.len() <= self.page_size as usize {
            return Ok(self);
        }
        Err(SyncError::Decode(format!(
            "page holds {} items but page_size is {}",
            self.items.len(),
            self.page_size
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: u64,
    pub url: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    #[serde(default, deserialize_with = "zero_as_none")]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub is_accessible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub id: u64,
    pub level: String,
    pub text: String,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinksResponse {
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeadingsResponse {
    #[serde(default)]
    pub headings: Vec<HeadingRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCrawl {
    pub id: ResultId,
    pub url: String,
}

/// Acknowledgement returned when a crawl is created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrawlAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<CreatedCrawl>,
}

/// Plain acknowledgement for bulk and stop actions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

// The backend reports 0 when a link was never probed.
fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u16>::deserialize(deserializer)?;
    Ok(value.filter(|code| *code != 0))
}
