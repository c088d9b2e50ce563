//! Dashboard core: pure synchronization state machines and view-model helpers.
mod detail;
mod effect;
mod error;
mod model;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use detail::{update_detail, DetailEffect, DetailMsg, DetailState, FacetResults, Generation};
pub use effect::{Effect, RequestId};
pub use error::SyncError;
pub use model::{
    Ack, CrawlAck, CrawlStatus, CrawlSummary, CreatedCrawl, HeadingRecord, HeadingsResponse,
    LinkKind, LinkRecord, LinksResponse, ResultId, ResultItem, ResultPage,
};
pub use msg::Msg;
pub use query::{ResultQuery, SortOrder, DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL_MS};
pub use state::{validate_submission, validate_url_batch, Notice, NoticeKind, SyncState};
pub use update::update;
pub use view_model::{accessibility_text, DetailView, StatusCodeClass, SyncView};
