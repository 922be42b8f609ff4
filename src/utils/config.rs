// src/utils/config.rs
use std::time::Duration;

use crate::utils::error::AppError;

pub const USER_AGENT_ENV: &str = "SEC_USER_AGENT";
pub const REQUEST_DELAY_ENV: &str = "SEC_REQUEST_DELAY_MS";

// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
const DEFAULT_REQUEST_DELAY_MS: u64 = 150;
const DEFAULT_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const DEFAULT_BROWSE_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar";
const DEFAULT_ARCHIVE_BASE_URL: &str = "https://www.sec.gov";

/// Network identity and endpoints for talking to EDGAR.
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// Sent as the User-Agent on every request. EDGAR rejects requests without contact info.
    pub user_agent: String,
    /// Pause before each request.
    pub request_delay: Duration,
    pub tickers_url: String,
    pub browse_url: String,
    /// Prefix for root-relative document links found on filing index pages.
    pub archive_base_url: String,
}

impl EdgarConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            tickers_url: DEFAULT_TICKERS_URL.to_string(),
            browse_url: DEFAULT_BROWSE_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
        }
    }

    /// Builds the config from CLI values, falling back to the environment.
    pub fn resolve(user_agent: Option<String>, request_delay_ms: Option<u64>) -> Result<Self, AppError> {
        Self::resolve_with(user_agent, request_delay_ms, |key| std::env::var(key).ok())
    }

    fn resolve_with<F>(user_agent: Option<String>, request_delay_ms: Option<u64>, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = user_agent
            .or_else(|| env(USER_AGENT_ENV))
            .map(|ua| ua.trim().to_string())
            .filter(|ua| !ua.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "a contact User-Agent is required (pass --user-agent or set {})",
                    USER_AGENT_ENV
                ))
            })?;

        let delay_ms = match request_delay_ms {
            Some(ms) => ms,
            None => match env(REQUEST_DELAY_ENV) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                    AppError::Config(format!("invalid {} value '{}': {}", REQUEST_DELAY_ENV, raw, e))
                })?,
                None => DEFAULT_REQUEST_DELAY_MS,
            },
        };

        let mut config = Self::new(user_agent);
        config.request_delay = Duration::from_millis(delay_ms);
        tracing::debug!("Resolved EDGAR config: {:?}", config);
        Ok(config)
    }
}
