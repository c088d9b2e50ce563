use crate::{RequestId, ResultPage, ResultQuery, SyncError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Caller asked for a page (initial load, manual refresh, pagination).
    RefreshRequested(ResultQuery),
    /// The poll timer fired.
    PollTick,
    /// A results fetch settled.
    ResultsLoaded {
        request: RequestId,
        result: Result<ResultPage, SyncError>,
    },
    /// The task awaiting a results fetch was dropped before it settled.
    FetchAbandoned(RequestId),
    /// A create/rerun/delete/stop request was sent to the provider.
    MutationStarted,
    /// The provider acknowledged a mutation; refresh to reflect it.
    MutationSucceeded { message: String },
    /// A mutation was rejected locally or by the provider.
    MutationFailed(SyncError),
    /// The task awaiting a mutation was dropped before the provider answered.
    MutationAbandoned,
    StartPolling,
    StopPolling,
    /// The owning session is going away.
    Shutdown,
}
