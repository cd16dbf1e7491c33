use serde::{Deserialize, Serialize};

use crate::view_model::CrawlSummary;
use crate::{PendingListing, SearchQuery};

/// What happens to a listing whose page could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchFailurePolicy {
    /// Mark the listing visited without detail fields and keep going.
    #[default]
    MarkVisited,
    /// End the run on a transient failure; the listing stays pending for the
    /// next run. Permanent failures are still marked visited.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    pub max_pages: u32,
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: 10,
            fetch_failure_policy: FetchFailurePolicy::MarkVisited,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Discovering {
        page: u32,
    },
    Crawling,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrawlState {
    phase: Phase,
    query: SearchQuery,
    options: CrawlOptions,
    current: Option<PendingListing>,
    current_failed: bool,
    pages: u32,
    discovered: usize,
    skipped: usize,
    processed: usize,
    failed: usize,
    without_extractor: usize,
}

impl CrawlState {
    pub fn new(query: SearchQuery, options: CrawlOptions) -> Self {
        Self {
            query,
            options,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<&PendingListing> {
        self.current.as_ref()
    }

    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            phase: self.phase,
            pages: self.pages,
            discovered: self.discovered,
            skipped: self.skipped,
            processed: self.processed,
            failed: self.failed,
            without_extractor: self.without_extractor,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Finished | Phase::Aborted)
    }

    pub(crate) fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub(crate) fn options(&self) -> &CrawlOptions {
        &self.options
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn record_page(&mut self, upserted: usize, skipped: usize) {
        self.pages += 1;
        self.discovered += upserted;
        self.skipped += skipped;
    }

    pub(crate) fn begin_listing(&mut self, listing: PendingListing) {
        self.current = Some(listing);
        self.current_failed = false;
    }

    pub(crate) fn is_current(&self, url: &str) -> bool {
        self.current.as_ref().is_some_and(|l| l.url == url)
    }

    pub(crate) fn record_without_extractor(&mut self) {
        self.without_extractor += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed += 1;
        self.current_failed = true;
    }

    pub(crate) fn finish_listing(&mut self) {
        if !self.current_failed {
            self.processed += 1;
        }
        self.current = None;
        self.current_failed = false;
    }
}
