#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Search location must not be empty")]
    InvalidQuery,

    #[error("Unknown category `{0}`, expected one of buy, rent, sold")]
    InvalidCategory(String),

    #[error("Invalid allow pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Fetching {url} failed with status {status}")]
    FetchFailed { url: String, status: u16 },

    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlerError {
    /// True when the error means stdout was closed by the reader.
    pub fn is_broken_pipe(&self) -> bool {
        let io = match self {
            CrawlerError::Io(e) => Some(e),
            CrawlerError::Csv(e) => match e.kind() {
                csv::ErrorKind::Io(e) => Some(e),
                _ => None,
            },
            _ => None,
        };
        matches!(io, Some(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
