use dashboard_core::{
    update, update_detail, CrawlStatus, DetailMsg, DetailState, Effect, Msg, ResultItem,
    ResultPage, ResultQuery, SyncState,
};
use pretty_assertions::assert_eq;

fn polling_state() -> SyncState {
    let (state, effects) = update(
        SyncState::new(),
        Msg::RefreshRequested(ResultQuery::with_page_size(10)),
    );
    let Some(Effect::FetchResults { request, .. }) = effects.into_iter().next() else {
        panic!("expected a fetch");
    };
    let page = ResultPage {
        items: vec![ResultItem::new(1, "https://example.com", CrawlStatus::Running)],
        total: 1,
        page: 1,
        page_size: 10,
        total_pages: 1,
    };
    let (state, _) = update(
        state,
        Msg::ResultsLoaded {
            request,
            result: Ok(page),
        },
    );
    state
}

#[test]
fn abandoned_fetch_releases_the_tick_skip() {
    let state = polling_state();
    let (state, effects) = update(state, Msg::RefreshRequested(ResultQuery::with_page_size(10)));
    let Some(Effect::FetchResults { request, .. }) = effects.into_iter().next() else {
        panic!("expected a fetch");
    };
    assert!(update(state.clone(), Msg::PollTick).1.is_empty());

    let before = state.page().clone();
    let (state, effects) = update(state, Msg::FetchAbandoned(request));
    assert!(effects.is_empty());
    assert_eq!(state.in_flight(), 0);
    assert!(!state.is_loading());
    assert_eq!(state.page(), &before);
    assert_eq!(state.last_error(), None);
    assert!(state.is_polling());

    let (_, effects) = update(state, Msg::PollTick);
    assert_eq!(effects.len(), 1);
}

#[test]
fn abandoned_mutation_clears_loading_without_a_notice() {
    let (state, _) = update(SyncState::new(), Msg::MutationStarted);
    assert!(state.is_loading());

    let (state, effects) = update(state, Msg::MutationAbandoned);
    assert!(effects.is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.view().notice, None);
}

#[test]
fn abandoned_detail_open_stops_loading_only_for_its_generation() {
    let (state, _) = update_detail(DetailState::new(), DetailMsg::Opened(1));
    let (state, _) = update_detail(state, DetailMsg::Opened(2));

    let (state, _) = update_detail(state, DetailMsg::Abandoned { generation: 1 });
    assert!(state.view().is_loading);

    let (mut state, _) = update_detail(state, DetailMsg::Abandoned { generation: 2 });
    let view = state.view();
    assert!(!view.is_loading);
    assert_eq!(view.target_id, Some(2));
    assert!(view.meta.is_none());
    assert!(state.consume_dirty());
}
