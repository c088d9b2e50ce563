use crate::ResultQuery;

/// Monotonic id attached to each results fetch. Zero means "none yet".
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the results provider for one page.
    FetchResults {
        request: RequestId,
        query: ResultQuery,
    },
    /// Arm the repeating poll timer, replacing any existing one.
    StartPollTimer,
    /// Cancel the poll timer if one is armed.
    CancelPollTimer,
}
