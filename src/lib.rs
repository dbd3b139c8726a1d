use reqwest::Url;
use scraper::Html;
use std::{future::Future, io::Write, sync::Arc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub mod config;
pub mod fetch;
pub mod frontier;
pub mod query;
pub mod realestate;
pub mod writer;

mod error;

pub use config::CrawlConfig;
pub use error::CrawlerError;

use fetch::{Fetch, HttpFetcher, Page};
use frontier::Frontier;
use query::{PageRef, SearchQuery};
use realestate::RealestateCrawler;
use writer::{CsvRecord, RecordWriter};

pub struct CrawlerResult<R> {
    pub records: Vec<R>,
    pub links: Vec<String>,
}

pub trait Crawler {
    type Record: CsvRecord + Send + 'static;

    fn extract_records(&self, doc: &Html) -> Vec<Self::Record>;
    fn extract_links(&self, doc: &Html, page_url: &Url) -> Vec<String>;

    fn crawl(&self, page: &Page) -> CrawlerResult<Self::Record> {
        let doc = Html::parse_document(&page.body);
        let records = self.extract_records(&doc);
        let links = match Url::parse(&page.url) {
            Ok(page_url) => self.extract_links(&doc, &page_url),
            Err(e) => {
                warn!("Not following links of {}: {}", page.url, e);
                vec![]
            }
        };
        CrawlerResult { records, links }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    pub fetched: u64,
    pub failed: u64,
    pub records: u64,
}

type Visit<R> = (PageRef, Result<CrawlerResult<R>, CrawlerError>);

/// Breadth first crawl over pages accepted by a [`Crawler`].
///
/// The driver is the only owner of the frontier and the writer. Fetch tasks
/// hand back owned results, so urls are dispatched once and rows are
/// written whole.
pub struct CrawlDriver<C: Crawler, F, W: Write> {
    crawler: Arc<C>,
    fetcher: Arc<F>,
    writer: RecordWriter<W, C::Record>,
    frontier: Frontier,
    workers: usize,
    summary: CrawlSummary,
}

impl<C, F, W> CrawlDriver<C, F, W>
where
    C: Crawler + Send + Sync + 'static,
    F: Fetch + 'static,
    W: Write,
{
    pub fn new(crawler: C, fetcher: F, writer: RecordWriter<W, C::Record>, workers: usize) -> Self {
        CrawlDriver {
            crawler: Arc::new(crawler),
            fetcher: Arc::new(fetcher),
            writer,
            frontier: Frontier::new(),
            workers: workers.max(1),
            summary: CrawlSummary::default(),
        }
    }

    pub fn seed<S: AsRef<str>>(&mut self, url: S) -> bool {
        self.frontier.enqueue(url)
    }

    /// Crawls until the frontier runs dry or `shutdown` resolves, then closes
    /// the writer.
    pub async fn run<S>(mut self, shutdown: S) -> Result<CrawlSummary, CrawlerError>
    where
        S: Future<Output = ()>,
    {
        let result = self.drive(shutdown).await;
        let closed = self.writer.close();
        result?;
        closed?;
        info!(
            "Crawl finished: {} urls seen, {} pages fetched, {} failed, {} records",
            self.frontier.seen(),
            self.summary.fetched,
            self.summary.failed,
            self.summary.records
        );
        Ok(self.summary)
    }

    async fn drive<S>(&mut self, shutdown: S) -> Result<(), CrawlerError>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut in_flight = JoinSet::new();

        loop {
            while in_flight.len() < self.workers {
                let Some(page) = self.frontier.next() else {
                    break;
                };
                debug!("Visit {}", page.url);
                in_flight.spawn(visit(
                    Arc::clone(&self.crawler),
                    Arc::clone(&self.fetcher),
                    page,
                ));
            }

            if in_flight.is_empty() {
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    warn!(
                        "Interrupted, dropping {} in flight and {} queued pages",
                        in_flight.len(),
                        self.frontier.pending()
                    );
                    in_flight.shutdown().await;
                    return Ok(());
                }
                Some(joined) = in_flight.join_next() => match joined {
                    Ok((page, result)) => self.handle(page, result)?,
                    Err(e) => {
                        warn!("Fetch task ended abnormally: {}", e);
                        self.summary.failed += 1;
                    }
                },
            }
        }
    }

    fn handle(
        &mut self,
        page: PageRef,
        result: Result<CrawlerResult<C::Record>, CrawlerError>,
    ) -> Result<(), CrawlerError> {
        match result {
            Ok(CrawlerResult { records, links }) => {
                self.summary.fetched += 1;
                for record in &records {
                    self.writer.write_record(record)?;
                }
                self.summary.records = self.writer.written();

                let found = links.len();
                let queued = links
                    .into_iter()
                    .filter(|link| self.frontier.enqueue(link))
                    .count();
                debug!(
                    "Page {} ({}): {} records, {} links, {} new",
                    page.page,
                    page.url,
                    records.len(),
                    found,
                    queued
                );
            }
            Err(e) => {
                self.summary.failed += 1;
                warn!("Failed to crawl {}: {}", page.url, e);
            }
        }
        Ok(())
    }
}

async fn visit<C, F>(crawler: Arc<C>, fetcher: Arc<F>, page: PageRef) -> Visit<C::Record>
where
    C: Crawler,
    F: Fetch,
{
    let result = match fetcher.fetch(&page.url).await {
        Ok(fetched) => Ok(crawler.crawl(&fetched)),
        Err(e) => Err(e),
    };
    (page, result)
}

/// Crawls every results page of `query` and writes the listings to `out` as csv.
pub async fn run_search<W, S>(
    query: &SearchQuery,
    config: &CrawlConfig,
    out: W,
    shutdown: S,
) -> Result<CrawlSummary, CrawlerError>
where
    W: Write,
    S: Future<Output = ()>,
{
    let urls = query.urls(&config.base_url)?;
    let crawler = RealestateCrawler::for_search(&config.base_url, &urls);
    let fetcher = HttpFetcher::new(config)?;
    let writer = RecordWriter::open(out)?;

    info!(
        "Searching {} in {} starting at {}",
        query.category(),
        query.location(),
        urls.seed
    );
    let mut driver = CrawlDriver::new(crawler, fetcher, writer, config.workers);
    driver.seed(urls.seed.as_str());
    driver.run(shutdown).await
}
