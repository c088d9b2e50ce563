//! Dashboard client: results provider transport and the runtime that executes
//! core effects (fetches and the poll timer).
mod config;
mod detail;
mod http;
mod provider;
mod settle;
mod synchronizer;
mod timer;

pub use config::{DashboardConfig, SyncSettings};
pub use detail::{DetailFetcher, Settlement};
pub use http::HttpResultsProvider;
pub use provider::ResultsProvider;
pub use synchronizer::ResultsSynchronizer;
