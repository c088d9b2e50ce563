use dashboard_core::{
    update, validate_submission, validate_url_batch, Effect, Msg, NoticeKind, ResultQuery,
    SyncError, SyncState,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    dashboard_logging::initialize_for_tests();
}

#[test]
fn blank_submissions_are_rejected() {
    init_logging();
    for raw in ["", "   ", "\t\n"] {
        let err = validate_submission(raw).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "URL is required");
    }
    assert_eq!(
        validate_submission("  https://example.com ").unwrap(),
        "https://example.com"
    );
}

#[test]
fn url_batches_drop_blank_entries() {
    init_logging();
    let urls = validate_url_batch([" https://a.example.com", "", "  ", "https://b.example.com "])
        .unwrap();
    assert_eq!(urls, vec!["https://a.example.com", "https://b.example.com"]);

    let err = validate_url_batch(Vec::<String>::new()).unwrap_err();
    assert!(err.is_validation());
    assert!(validate_url_batch(["  "]).unwrap_err().is_validation());
}

#[test]
fn mutation_success_records_notice_and_refreshes_last_query() {
    init_logging();
    let query = ResultQuery::with_page_size(25).page(2);
    let state = SyncState::with_query(query.clone());

    let (state, effects) = update(state, Msg::MutationStarted);
    assert!(effects.is_empty());
    assert!(state.view().is_loading);

    let (state, effects) = update(
        state,
        Msg::MutationSucceeded {
            message: "URL submitted for crawling".to_string(),
        },
    );

    assert_eq!(effects, vec![Effect::FetchResults { request: 1, query }]);
    let view = state.view();
    let notice = view.notice.expect("notice");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "URL submitted for crawling");
    assert!(view.is_loading);
}

#[test]
fn mutation_failure_is_tagged_even_without_error_in_text() {
    init_logging();
    let (state, _) = update(SyncState::new(), Msg::MutationStarted);
    let (state, effects) = update(
        state,
        Msg::MutationFailed(SyncError::Request {
            status: 409,
            message: "already crawling".to_string(),
        }),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.is_loading);
    assert_eq!(view.last_error.as_deref(), Some("already crawling"));
    let notice = view.notice.expect("notice");
    assert!(notice.is_failure());
    assert_eq!(notice.text, "already crawling");
}

#[test]
fn success_message_mentioning_error_stays_a_success() {
    init_logging();
    let (state, _) = update(
        SyncState::new(),
        Msg::MutationSucceeded {
            message: "Error pages will be re-crawled".to_string(),
        },
    );
    assert_eq!(state.view().notice.unwrap().kind, NoticeKind::Success);
}

#[test]
fn tick_during_mutation_refresh_is_skipped() {
    init_logging();
    let (state, _) = update(SyncState::new(), Msg::StartPolling);
    let (state, _) = update(state, Msg::MutationStarted);
    let (state, effects) = update(
        state,
        Msg::MutationSucceeded {
            message: "ok".to_string(),
        },
    );
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
    assert_eq!(state.in_flight(), 1);
}
