use crate::view_model::DetailView;
use crate::{HeadingRecord, LinkRecord, ResultId, ResultItem, SyncError};

/// Incremented on every open and close; only the current generation commits.
pub type Generation = u64;

/// Outcome of the three concurrent facet requests for one open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetResults {
    pub meta: Result<ResultItem, SyncError>,
    pub links: Result<Vec<LinkRecord>, SyncError>,
    pub headings: Result<Vec<HeadingRecord>, SyncError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailMsg {
    /// User selected a row.
    Opened(ResultId),
    /// All three facet requests for `generation` have settled.
    Settled {
        generation: Generation,
        facets: FacetResults,
    },
    /// The task awaiting `generation` was dropped before its facets settled.
    Abandoned { generation: Generation },
    /// User dismissed the details.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEffect {
    FetchFacets { generation: Generation, id: ResultId },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailState {
    generation: Generation,
    target_id: Option<ResultId>,
    meta: Option<ResultItem>,
    links: Vec<LinkRecord>,
    headings: Vec<HeadingRecord>,
    loading: bool,
    diagnostic: Option<String>,
    dirty: bool,
}

impl DetailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DetailView {
        DetailView {
            target_id: self.target_id,
            meta: self.meta.clone(),
            links: self.links.clone(),
            headings: self.headings.clone(),
            is_loading: self.loading,
            diagnostic: self.diagnostic.clone(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.target_id.is_some() && generation == self.generation
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn clear_facets(&mut self) {
        self.meta = None;
        self.links.clear();
        self.headings.clear();
        self.diagnostic = None;
    }
}

/// Pure update for the detail view.
pub fn update_detail(mut state: DetailState, msg: DetailMsg) -> (DetailState, Vec<DetailEffect>) {
    let effects = match msg {
        DetailMsg::Opened(id) => {
            state.generation += 1;
            state.target_id = Some(id);
            state.loading = true;
            state.clear_facets();
            state.dirty = true;
            vec![DetailEffect::FetchFacets {
                generation: state.generation,
                id,
            }]
        }
        DetailMsg::Settled { generation, facets } => {
            if !state.is_current(generation) {
                return (state, Vec::new());
            }
            let mut failures = Vec::new();
            state.meta = keep_or_note(facets.meta, "metadata", &mut failures);
            state.links = keep_or_note(facets.links, "links", &mut failures).unwrap_or_default();
            state.headings =
                keep_or_note(facets.headings, "headings", &mut failures).unwrap_or_default();
            state.diagnostic = (!failures.is_empty())
                .then(|| format!("Failed to load crawl details ({})", failures.join("; ")));
            state.loading = false;
            state.dirty = true;
            Vec::new()
        }
        DetailMsg::Abandoned { generation } => {
            if state.is_current(generation) && state.loading {
                state.loading = false;
                state.dirty = true;
            }
            Vec::new()
        }
        DetailMsg::Closed => {
            // Bump so responses from the abandoned open are dropped on arrival.
            state.generation += 1;
            state.target_id = None;
            state.loading = false;
            state.clear_facets();
            state.dirty = true;
            Vec::new()
        }
    };

    (state, effects)
}

fn keep_or_note<T>(
    result: Result<T, SyncError>,
    facet: &str,
    failures: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            failures.push(format!("{facet}: {err}"));
            None
        }
    }
}
