use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join3;
use tokio::sync::watch;

use dashboard_core::{
    update_detail, DetailEffect, DetailMsg, DetailState, DetailView, FacetResults, Generation,
    ResultId,
};
use dashboard_logging::{dash_debug, dash_warn};

use crate::settle::SettleOnDrop;
use crate::ResultsProvider;

/// What happened to the results of one `open` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// All three facets were written into the view.
    Committed,
    /// A later `open` or a `close` made the results obsolete; they were dropped.
    Superseded,
}

/// Fetches the metadata, links and headings of one result as a single view swap.
#[derive(Clone)]
pub struct DetailFetcher {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn ResultsProvider>,
    state: Mutex<DetailState>,
    view_tx: watch::Sender<DetailView>,
}

impl DetailFetcher {
    pub fn new(provider: Arc<dyn ResultsProvider>) -> Self {
        let (view_tx, _) = watch::channel(DetailView::default());
        Self {
            inner: Arc::new(Inner {
                provider,
                state: Mutex::new(DetailState::new()),
                view_tx,
            }),
        }
    }

    /// Show `id`. Resolves once all three requests have settled.
    pub async fn open(&self, id: ResultId) -> Settlement {
        let mut settlement = Settlement::Superseded;
        for effect in self.inner.dispatch(DetailMsg::Opened(id)) {
            match effect {
                DetailEffect::FetchFacets { generation, id } => {
                    settlement = self.inner.fetch_facets(generation, id).await;
                }
            }
        }
        settlement
    }

    pub fn close(&self) {
        self.inner.dispatch(DetailMsg::Closed);
    }

    pub fn view(&self) -> DetailView {
        lock(&self.inner.state).view()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailView> {
        self.inner.view_tx.subscribe()
    }
}

impl Inner {
    fn dispatch(&self, msg: DetailMsg) -> Vec<DetailEffect> {
        let mut guard = lock(&self.state);
        self.transition(&mut guard, msg)
    }

    fn transition(
        &self,
        guard: &mut MutexGuard<'_, DetailState>,
        msg: DetailMsg,
    ) -> Vec<DetailEffect> {
        let state = std::mem::take(&mut **guard);
        let (mut state, effects) = update_detail(state, msg);
        if state.consume_dirty() {
            self.view_tx.send_replace(state.view());
        }
        **guard = state;
        effects
    }

    async fn fetch_facets(&self, generation: Generation, id: ResultId) -> Settlement {
        dash_debug!("fetching details id={} generation={}", id, generation);
        let pending = SettleOnDrop::new(|| {
            dash_debug!("details id={} generation={} abandoned", id, generation);
            self.dispatch(DetailMsg::Abandoned { generation });
        });
        let (meta, links, headings) = join3(
            self.provider.get_result_meta(id),
            self.provider.get_links(id),
            self.provider.get_headings(id),
        )
        .await;
        pending.disarm();
        self.settle(
            generation,
            id,
            FacetResults {
                meta,
                links,
                headings,
            },
        )
    }

    fn settle(&self, generation: Generation, id: ResultId, facets: FacetResults) -> Settlement {
        let mut guard = lock(&self.state);
        if !guard.is_current(generation) {
            dash_debug!("dropping superseded details id={} generation={}", id, generation);
            return Settlement::Superseded;
        }
        self.transition(&mut guard, DetailMsg::Settled { generation, facets });
        if let Some(diagnostic) = guard.view().diagnostic {
            dash_warn!("details id={}: {}", id, diagnostic);
        }
        Settlement::Committed
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
