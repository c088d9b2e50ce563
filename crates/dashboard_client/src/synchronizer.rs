use std::collections::VecDeque;
use std::future::Future;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use dashboard_core::{
    update, validate_submission, validate_url_batch, Ack, CrawlAck, Effect, Msg, ResultId,
    ResultPage, ResultQuery, SyncError, SyncState, SyncView,
};
use dashboard_logging::{dash_debug, dash_info, dash_warn};

use crate::settle::SettleOnDrop;
use crate::timer::PollTimer;
use crate::{ResultsProvider, SyncSettings};

trait Acknowledged {
    fn message(&self) -> &str;
}

impl Acknowledged for CrawlAck {
    fn message(&self) -> &str {
        &self.message
    }
}

impl Acknowledged for Ack {
    fn message(&self) -> &str {
        &self.message
    }
}

/// Owns one session's result page and its poll timer.
///
/// Clones share the same session. All state writes go through the core
/// `update` function; the mutex is never held across an await.
#[derive(Clone)]
pub struct ResultsSynchronizer {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn ResultsProvider>,
    settings: SyncSettings,
    state: Mutex<SyncState>,
    timer: Mutex<PollTimer>,
    view_tx: watch::Sender<SyncView>,
}

impl ResultsSynchronizer {
    pub fn new(provider: Arc<dyn ResultsProvider>, settings: SyncSettings) -> Self {
        let state = SyncState::with_query(ResultQuery::with_page_size(settings.page_size));
        let (view_tx, _) = watch::channel(state.view());
        Self {
            inner: Arc::new(Inner {
                provider,
                settings,
                state: Mutex::new(state),
                timer: Mutex::new(PollTimer::default()),
                view_tx,
            }),
        }
    }

    /// Initial load with the session's default query.
    pub async fn start(&self) -> Result<(), SyncError> {
        let query = lock(&self.inner.state).last_query().clone();
        self.refresh(query).await
    }

    /// Fetch one page. On failure the previous page stays and `last_error` is set.
    pub async fn refresh(&self, query: ResultQuery) -> Result<(), SyncError> {
        self.inner.ensure_live()?;
        let effects = self.inner.dispatch(Msg::RefreshRequested(query));
        self.inner.run_effects(effects).await
    }

    /// Re-fetch with the last-used query.
    pub async fn refresh_current(&self) -> Result<(), SyncError> {
        let query = lock(&self.inner.state).last_query().clone();
        self.refresh(query).await
    }

    pub async fn submit_url(&self, raw: &str) -> Result<CrawlAck, SyncError> {
        self.inner.ensure_live()?;
        let url = self.inner.validated(validate_submission(raw))?;
        dash_info!("submitting crawl url={}", url);
        self.inner
            .mutate(self.inner.provider.create_crawl(&url), "URL added successfully")
            .await
    }

    pub async fn rerun_urls<S: AsRef<str>>(&self, urls: &[S]) -> Result<Ack, SyncError> {
        self.inner.ensure_live()?;
        let urls = self.inner.validated(validate_url_batch(urls))?;
        dash_info!("re-running {} urls", urls.len());
        self.inner
            .mutate(self.inner.provider.bulk_rerun(&urls), "URLs rerun successfully")
            .await
    }

    pub async fn delete_urls<S: AsRef<str>>(&self, urls: &[S]) -> Result<Ack, SyncError> {
        self.inner.ensure_live()?;
        let urls = self.inner.validated(validate_url_batch(urls))?;
        dash_info!("deleting {} urls", urls.len());
        self.inner
            .mutate(self.inner.provider.bulk_delete(&urls), "URLs deleted successfully")
            .await
    }

    pub async fn stop_crawl(&self, id: ResultId) -> Result<Ack, SyncError> {
        self.inner.ensure_live()?;
        dash_info!("stopping crawl id={}", id);
        let fallback = format!("Crawl with ID {id} stopped successfully");
        self.inner
            .mutate(self.inner.provider.stop_crawl(id), &fallback)
            .await
    }

    /// Must be called from within a tokio runtime.
    pub fn start_polling(&self) {
        let effects = self.inner.dispatch(Msg::StartPolling);
        self.inner.apply_timer_effects(effects);
    }

    pub fn stop_polling(&self) {
        let effects = self.inner.dispatch(Msg::StopPolling);
        self.inner.apply_timer_effects(effects);
    }

    pub fn is_polling(&self) -> bool {
        lock(&self.inner.state).is_polling()
    }

    pub fn has_active_timer(&self) -> bool {
        lock(&self.inner.timer).is_active()
    }

    pub fn snapshot(&self) -> SyncView {
        lock(&self.inner.state).view()
    }

    /// Receives a new snapshot whenever the state changes.
    ///
    /// Snapshots are published while the state lock is held, so do not call
    /// back into the synchronizer while holding a `borrow()` of the receiver.
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.inner.view_tx.subscribe()
    }

    /// Cancel the timer. Responses that arrive afterwards are dropped.
    pub fn shutdown(&self) {
        let effects = self.inner.dispatch(Msg::Shutdown);
        self.inner.apply_timer_effects(effects);
        dash_info!("synchronizer shut down");
    }
}

impl Inner {
    fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        self.dispatch_inspect(msg, |_| ()).0
    }

    /// Like `dispatch`, also returning what `inspect` reads from the state
    /// just before `msg` is applied.
    ///
    /// The view is published before the lock is released so that concurrent
    /// dispatches reach subscribers in the order they were applied.
    fn dispatch_inspect<R>(
        &self,
        msg: Msg,
        inspect: impl FnOnce(&SyncState) -> R,
    ) -> (Vec<Effect>, R) {
        let mut guard = lock(&self.state);
        let inspected = inspect(&guard);
        let state = std::mem::take(&mut *guard);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.view_tx.send_replace(state.view());
        }
        *guard = state;
        (effects, inspected)
    }

    fn ensure_live(&self) -> Result<(), SyncError> {
        if lock(&self.state).is_shut_down() {
            return Err(SyncError::ShutDown);
        }
        Ok(())
    }

    fn validated<T>(&self, input: Result<T, SyncError>) -> Result<T, SyncError> {
        input.inspect_err(|err| {
            dash_debug!("rejected input: {}", err);
            self.dispatch(Msg::MutationFailed(err.clone()));
        })
    }

    async fn mutate<T, F>(self: &Arc<Self>, request: F, fallback: &str) -> Result<T, SyncError>
    where
        T: Acknowledged,
        F: Future<Output = Result<T, SyncError>>,
    {
        self.dispatch(Msg::MutationStarted);
        let pending = SettleOnDrop::new(|| {
            dash_debug!("mutation abandoned before the provider answered");
            self.dispatch(Msg::MutationAbandoned);
        });
        let response = request.await;
        pending.disarm();
        match response {
            Ok(ack) => {
                let message = match ack.message().trim() {
                    "" => fallback.to_string(),
                    text => text.to_string(),
                };
                let effects = self.dispatch(Msg::MutationSucceeded { message });
                if let Err(err) = self.run_effects(effects).await {
                    dash_warn!("refresh after mutation failed: {}", err);
                }
                Ok(ack)
            }
            Err(err) => {
                dash_warn!("request rejected: {}", err);
                self.dispatch(Msg::MutationFailed(err.clone()));
                Err(err)
            }
        }
    }

    /// Execute effects until none remain. Returns the error of the last
    /// failed fetch that was not dropped as stale or after shutdown, if any.
    async fn run_effects(self: &Arc<Self>, effects: Vec<Effect>) -> Result<(), SyncError> {
        let mut queue = VecDeque::from(effects);
        let mut outcome = Ok(());
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::FetchResults { request, query } => {
                    dash_debug!(
                        "fetching results request={} page={} page_size={}",
                        request,
                        query.page,
                        query.page_size
                    );
                    let pending = SettleOnDrop::new(|| {
                        dash_debug!("results request {} abandoned", request);
                        self.dispatch(Msg::FetchAbandoned(request));
                    });
                    let result = self
                        .provider
                        .list_results(&query)
                        .await
                        .and_then(ResultPage::checked);
                    pending.disarm();

                    let failure = result.as_ref().err().cloned();
                    let (effects, dropped) = self.dispatch_inspect(
                        Msg::ResultsLoaded { request, result },
                        |state| state.is_shut_down() || state.is_stale(request),
                    );
                    if dropped {
                        dash_debug!("dropped results request {}", request);
                    } else if let Some(err) = failure {
                        dash_warn!("results request {} failed: {}", request, err);
                        outcome = Err(err);
                    }
                    queue.extend(effects);
                }
                Effect::StartPollTimer => self.arm_timer(),
                Effect::CancelPollTimer => self.disarm_timer(),
            }
        }
        outcome
    }

    fn apply_timer_effects(self: &Arc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPollTimer => self.arm_timer(),
                Effect::CancelPollTimer => self.disarm_timer(),
                Effect::FetchResults { request, .. } => {
                    dash_warn!("unexpected fetch request {} outside a refresh", request);
                }
            }
        }
    }

    fn arm_timer(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let period = self.settings.poll_interval;
        lock(&self.timer).start(period, move || {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(inner) => {
                        inner.poll_tick().await;
                        ControlFlow::Continue(())
                    }
                    None => ControlFlow::Break(()),
                }
            }
        });
        dash_info!("polling started interval_ms={}", period.as_millis());
    }

    fn disarm_timer(&self) {
        if lock(&self.timer).cancel() {
            dash_info!("polling stopped");
        }
    }

    async fn poll_tick(self: &Arc<Self>) {
        let effects = self.dispatch(Msg::PollTick);
        if effects.is_empty() {
            dash_debug!("poll tick skipped");
            return;
        }
        if let Err(err) = self.run_effects(effects).await {
            dash_debug!("poll tick refresh failed: {}", err);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
