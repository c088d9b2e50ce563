use dashboard_core::{
    Ack, CrawlAck, HeadingRecord, LinkRecord, ResultId, ResultItem, ResultPage, ResultQuery,
    SyncError,
};

/// Backend surface the synchronizer and detail fetcher consume.
#[async_trait::async_trait]
pub trait ResultsProvider: Send + Sync {
    async fn list_results(&self, query: &ResultQuery) -> Result<ResultPage, SyncError>;

    async fn create_crawl(&self, url: &str) -> Result<CrawlAck, SyncError>;

    async fn get_result_meta(&self, id: ResultId) -> Result<ResultItem, SyncError>;

    async fn get_links(&self, id: ResultId) -> Result<Vec<LinkRecord>, SyncError>;

    async fn get_headings(&self, id: ResultId) -> Result<Vec<HeadingRecord>, SyncError>;

    async fn bulk_rerun(&self, urls: &[String]) -> Result<Ack, SyncError>;

    async fn bulk_delete(&self, urls: &[String]) -> Result<Ack, SyncError>;

    async fn stop_crawl(&self, id: ResultId) -> Result<Ack, SyncError>;
}
