use crate::{CrawlConfig, CrawlerError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final url after redirects, used to resolve relative links.
    pub url: String,
    pub status: u16,
    pub body: String,
}

#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, CrawlerError>;
}

pub struct HttpFetcher {
    client: Client,
    retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(HttpFetcher {
            client,
            retries: config.retries,
            retry_delay: config.retry_delay,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<Page, CrawlerError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlerError::FetchFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!("Downloaded {} bytes from {}", body.len(), final_url);
        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}

fn is_retryable(err: &CrawlerError) -> bool {
    match err {
        CrawlerError::FetchFailed { status, .. } => *status >= 500,
        CrawlerError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        _ => false,
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Page, CrawlerError> {
        let mut delay = self.retry_delay;
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Err(e) if attempt < self.retries && is_retryable(&e) => {
                    attempt += 1;
                    warn!("Attempt {} for {} failed: {}, retrying in {:?}", attempt, url, e, delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                result => return result,
            }
        }
    }
}
