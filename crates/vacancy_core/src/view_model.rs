use crate::Phase;

/// Progress counters reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrawlSummary {
    pub phase: Phase,
    pub pages: u32,
    pub discovered: usize,
    pub skipped: usize,
    pub processed: usize,
    pub failed: usize,
    pub without_extractor: usize,
}

impl CrawlSummary {
    /// Listings whose row was written during the crawl, successful or not.
    pub fn visited(&self) -> usize {
        self.processed + self.failed
    }
}
