use crate::{Effect, Msg, Notice, ResultPage, SyncState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Once the state has been shut down every message is ignored, so late
/// responses from abandoned requests never write into it.
pub fn update(mut state: SyncState, msg: Msg) -> (SyncState, Vec<Effect>) {
    if state.is_shut_down() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::RefreshRequested(query) => {
            state.set_query(query);
            vec![fetch_last_query(&mut state)]
        }
        Msg::PollTick => {
            // Skip rather than queue: an outstanding fetch will report soon
            // enough, and a second one could land out of order.
            if !state.is_polling() || state.in_flight() > 0 {
                Vec::new()
            } else {
                vec![fetch_last_query(&mut state)]
            }
        }
        Msg::ResultsLoaded { request, result } => {
            state.finish_fetch();
            if state.is_stale(request) {
                return (state, Vec::new());
            }
            match result.and_then(ResultPage::checked) {
                Ok(page) => {
                    let active = page.has_active_crawls();
                    state.commit_page(request, page);
                    set_polling(&mut state, active)
                }
                Err(err) => {
                    state.record_error(&err);
                    Vec::new()
                }
            }
        }
        Msg::FetchAbandoned(_) => {
            state.finish_fetch();
            Vec::new()
        }
        Msg::MutationStarted => {
            state.set_mutating(true);
            Vec::new()
        }
        Msg::MutationSucceeded { message } => {
            state.set_mutating(false);
            state.set_notice(Notice::success(message));
            vec![fetch_last_query(&mut state)]
        }
        Msg::MutationFailed(err) => {
            state.set_mutating(false);
            state.record_error(&err);
            state.set_notice(Notice::failure(err.to_string()));
            Vec::new()
        }
        Msg::MutationAbandoned => {
            state.set_mutating(false);
            Vec::new()
        }
        Msg::StartPolling => set_polling(&mut state, true),
        Msg::StopPolling => set_polling(&mut state, false),
        Msg::Shutdown => {
            state.shut_down();
            vec![Effect::CancelPollTimer]
        }
    };

    (state, effects)
}

fn fetch_last_query(state: &mut SyncState) -> Effect {
    let request = state.begin_fetch();
    Effect::FetchResults {
        request,
        query: state.last_query().clone(),
    }
}

fn set_polling(state: &mut SyncState, polling: bool) -> Vec<Effect> {
    if !state.set_polling(polling) {
        return Vec::new();
    }
    if polling {
        vec![Effect::StartPollTimer]
    } else {
        vec![Effect::CancelPollTimer]
    }
}
