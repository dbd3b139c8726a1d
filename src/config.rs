use crate::query::DEFAULT_BASE_URL;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Scheme and host every request goes to.
    pub base_url: Url,
    /// Upper bound on fetches in flight.
    pub workers: usize,
    pub timeout: Duration,
    /// Extra attempts for transport errors and 5xx responses.
    pub retries: u32,
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("Invalid default base url"),
            workers: 1,
            timeout: Duration::from_secs(30),
            retries: 0,
            retry_delay: Duration::from_millis(500),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
