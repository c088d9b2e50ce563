use std::time::Duration;

use dashboard_core::{DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL_MS};
use dashboard_logging::dash_warn;

pub const ENV_API_BASE_URL: &str = "DASHBOARD_API_BASE_URL";
pub const ENV_API_KEY: &str = "DASHBOARD_API_KEY";
pub const ENV_AUTH_TOKEN: &str = "DASHBOARD_AUTH_TOKEN";
pub const ENV_POLL_INTERVAL_MS: &str = "DASHBOARD_POLL_INTERVAL_MS";
pub const ENV_PAGE_SIZE: &str = "DASHBOARD_PAGE_SIZE";

/// Settings the synchronizer itself consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub poll_interval: Duration,
    pub page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
    pub poll_interval: Duration,
    pub page_size: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let sync = SyncSettings::default();
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_key: Some("seo-crawler-api-key-2025".to_string()),
            auth_token: None,
            poll_interval: sync.poll_interval,
            page_size: sync.page_size,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep their
    /// defaults; numbers that fail to parse, or are zero, fall back with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let poll_interval = get(ENV_POLL_INTERVAL_MS)
            .and_then(|raw| parse_positive(ENV_POLL_INTERVAL_MS, &raw))
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        let page_size = get(ENV_PAGE_SIZE)
            .and_then(|raw| parse_positive(ENV_PAGE_SIZE, &raw))
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(defaults.page_size);

        Self {
            api_base_url: get(ENV_API_BASE_URL).unwrap_or(defaults.api_base_url),
            api_key: get(ENV_API_KEY).or(defaults.api_key),
            auth_token: get(ENV_AUTH_TOKEN),
            poll_interval,
            page_size,
            ..defaults
        }
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            poll_interval: self.poll_interval,
            page_size: self.page_size,
        }
    }
}

fn parse_positive(key: &str, raw: &str) -> Option<u64> {
    match raw.parse::<u64>() {
        Ok(0) => {
            dash_warn!("{} must be positive, using default", key);
            None
        }
        Ok(value) => Some(value),
        Err(err) => {
            dash_warn!("{}={:?} is not a number ({}), using default", key, raw, err);
            None
        }
    }
}
