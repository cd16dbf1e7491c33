use vacancy_core::{CrawlSummary, DispatchRoute};

use crate::FailureKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    PageDiscovered {
        page: u32,
        url: String,
        upserted: usize,
        skipped: usize,
    },
    ListingProcessed {
        url: String,
        partner: String,
        route: DispatchRoute,
    },
    ListingFailed {
        url: String,
        kind: FailureKind,
    },
    Finished(CrawlSummary),
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: CrawlEvent) {}
}
