#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use dashboard_client::{ResultsProvider, SyncSettings};
use dashboard_core::{
    Ack, CrawlAck, CrawlStatus, CreatedCrawl, HeadingRecord, LinkKind, LinkRecord, ResultId,
    ResultItem, ResultPage, ResultQuery, SyncError,
};
use tokio::sync::watch;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(dashboard_logging::initialize_for_tests);
}

pub fn settings(poll_secs: u64) -> SyncSettings {
    SyncSettings {
        poll_interval: Duration::from_secs(poll_secs),
        page_size: 10,
    }
}

pub fn page_of(statuses: &[CrawlStatus]) -> ResultPage {
    ResultPage {
        items: statuses
            .iter()
            .enumerate()
            .map(|(idx, status)| {
                let id = idx as u64 + 1;
                ResultItem::new(id, format!("https://site{id}.example.com"), *status)
            })
            .collect(),
        total: statuses.len() as u64,
        page: 1,
        page_size: 10,
        total_pages: 1,
    }
}

/// Closed until `open` is called; waiters registered before or after both pass.
#[derive(Clone)]
pub struct Gate(Arc<watch::Sender<bool>>);

impl Gate {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self(Arc::new(tx))
    }

    pub async fn wait(&self) {
        let mut rx = self.0.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }

    pub fn open(&self) {
        self.0.send_replace(true);
    }
}

/// Yield until `condition` holds. Does not advance paused time.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

/// In-memory provider with scripted responses, call counters and gates.
#[derive(Default)]
pub struct FakeProvider {
    current: Mutex<ResultPage>,
    scripted: Mutex<VecDeque<Result<ResultPage, SyncError>>>,
    queries: Mutex<Vec<ResultQuery>>,
    list_calls: AtomicUsize,
    list_gate: Mutex<Option<Gate>>,
    next_list_gate: Mutex<Option<Gate>>,
    create_gate: Mutex<Option<Gate>>,
    created: Mutex<Vec<String>>,
    create_error: Mutex<Option<SyncError>>,
    bulk: Mutex<Vec<(&'static str, Vec<String>)>>,
    stopped: Mutex<Vec<ResultId>>,
    detail_calls: Mutex<HashMap<ResultId, usize>>,
    detail_gates: Mutex<HashMap<ResultId, Gate>>,
    failing_links: Mutex<HashSet<ResultId>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_page(&self, page: ResultPage) {
        *self.current.lock().unwrap() = page;
    }

    /// Answer the next list call with `response` instead of the current page.
    pub fn push_response(&self, response: Result<ResultPage, SyncError>) {
        self.scripted.lock().unwrap().push_back(response);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<ResultQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Block list calls until the returned gate opens.
    pub fn hold_results(&self) -> Gate {
        let gate = Gate::new();
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Block only the next list call until the returned gate opens.
    pub fn hold_next_result(&self) -> Gate {
        let gate = Gate::new();
        *self.next_list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Block create calls until the returned gate opens.
    pub fn hold_create(&self) -> Gate {
        let gate = Gate::new();
        *self.create_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn fail_create(&self, err: SyncError) {
        *self.create_error.lock().unwrap() = Some(err);
    }

    pub fn bulk(&self) -> Vec<(&'static str, Vec<String>)> {
        self.bulk.lock().unwrap().clone()
    }

    pub fn stopped(&self) -> Vec<ResultId> {
        self.stopped.lock().unwrap().clone()
    }

    pub fn hold_details(&self, id: ResultId) -> Gate {
        let gate = Gate::new();
        self.detail_gates.lock().unwrap().insert(id, gate.clone());
        gate
    }

    pub fn fail_links(&self, id: ResultId) {
        self.failing_links.lock().unwrap().insert(id);
    }

    pub fn detail_calls(&self, id: ResultId) -> usize {
        self.detail_calls.lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    async fn enter_detail(&self, id: ResultId) {
        *self.detail_calls.lock().unwrap().entry(id).or_default() += 1;
        let gate = self.detail_gates.lock().unwrap().get(&id).cloned();
        if let Some(gate) = gate {
            gate.wait().await;
        }
    }
}

#[async_trait::async_trait]
impl ResultsProvider for FakeProvider {
    /// The response is chosen when the call starts, so a held call returns
    /// what was current at that moment.
    async fn list_results(&self, query: &ResultQuery) -> Result<ResultPage, SyncError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        let scripted = self.scripted.lock().unwrap().pop_front();
        let response = scripted.unwrap_or_else(|| Ok(self.current.lock().unwrap().clone()));

        let gate = self.next_list_gate.lock().unwrap().take();
        let gate = gate.or_else(|| self.list_gate.lock().unwrap().clone());
        if let Some(gate) = gate {
            gate.wait().await;
        }
        response
    }

    async fn create_crawl(&self, url: &str) -> Result<CrawlAck, SyncError> {
        let gate = self.create_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        if let Some(err) = self.create_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut created = self.created.lock().unwrap();
        created.push(url.to_string());
        Ok(CrawlAck {
            message: "URL submitted for crawling".to_string(),
            data: Some(CreatedCrawl {
                id: created.len() as u64,
                url: url.to_string(),
            }),
        })
    }

    async fn get_result_meta(&self, id: ResultId) -> Result<ResultItem, SyncError> {
        self.enter_detail(id).await;
        Ok(ResultItem::new(id, format!("https://site{id}.example.com"), CrawlStatus::Done))
    }

    async fn get_links(&self, id: ResultId) -> Result<Vec<LinkRecord>, SyncError> {
        self.enter_detail(id).await;
        if self.failing_links.lock().unwrap().contains(&id) {
            return Err(SyncError::Request {
                status: 500,
                message: "Failed to fetch links".to_string(),
            });
        }
        Ok(vec![LinkRecord {
            id: 1,
            url: format!("https://site{id}.example.com/about"),
            text: Some("About".to_string()),
            kind: LinkKind::Internal,
            status_code: Some(200),
            is_accessible: true,
        }])
    }

    async fn get_headings(&self, id: ResultId) -> Result<Vec<HeadingRecord>, SyncError> {
        self.enter_detail(id).await;
        Ok(vec![HeadingRecord {
            id: 1,
            level: "h1".to_string(),
            text: format!("Site {id}"),
            order: 1,
        }])
    }

    async fn bulk_rerun(&self, urls: &[String]) -> Result<Ack, SyncError> {
        self.bulk.lock().unwrap().push(("rerun", urls.to_vec()));
        Ok(Ack {
            message: "Re-crawling URLs".to_string(),
        })
    }

    async fn bulk_delete(&self, urls: &[String]) -> Result<Ack, SyncError> {
        self.bulk.lock().unwrap().push(("delete", urls.to_vec()));
        Ok(Ack::default())
    }

    async fn stop_crawl(&self, id: ResultId) -> Result<Ack, SyncError> {
        self.stopped.lock().unwrap().push(id);
        Ok(Ack {
            message: "Crawling stopped".to_string(),
        })
    }
}
