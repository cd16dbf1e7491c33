use vacancy_core::QueryError;

use crate::{FetchError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid search query: {0}")]
    Query(#[from] QueryError),
    #[error("crawl aborted at {url}: {reason}")]
    Aborted { url: String, reason: String },
    #[error("could not build the HTTP client: {0}")]
    Client(#[source] FetchError),
}

impl CrawlError {
    /// The url that was in progress when the run stopped, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            CrawlError::Fetch { url, .. } | CrawlError::Aborted { url, .. } => Some(url),
            CrawlError::Store(_) | CrawlError::Query(_) | CrawlError::Client(_) => None,
        }
    }
}
