use std::sync::atomic::{AtomicUsize, Ordering};

use crawl_logging::{crawl_info, crawl_warn};
use vacancy_core::DispatchRoute;
use vacancy_engine::{CrawlEvent, ProgressSink};

/// Reports crawl progress through the logger.
#[derive(Debug, Default)]
pub struct LogProgress {
    visited: AtomicUsize,
}

impl ProgressSink for LogProgress {
    fn emit(&self, event: CrawlEvent) {
        match event {
            CrawlEvent::PageDiscovered {
                page,
                url,
                upserted,
                skipped,
            } => {
                crawl_info!("Results page {page}: {upserted} listings, {skipped} skipped ({url})");
            }
            CrawlEvent::ListingProcessed {
                url,
                partner,
                route,
            } => {
                let n = self.visited.fetch_add(1, Ordering::Relaxed) + 1;
                let how = match route {
                    DispatchRoute::Specific => "partner extractor",
                    DispatchRoute::Generic => "generic extractor",
                    DispatchRoute::NoExtractor => "no extractor",
                };
                crawl_info!("[{n}] {url} ({partner:?}, {how})");
            }
            CrawlEvent::ListingFailed { url, kind } => {
                crawl_warn!("Could not fetch {url}: {kind}");
            }
            CrawlEvent::Finished(summary) => {
                crawl_info!(
                    "Done: {} pages, {} listings found, {} visited ({} failed, {} without extractor)",
                    summary.pages,
                    summary.discovered,
                    summary.visited(),
                    summary.failed,
                    summary.without_extractor
                );
            }
        }
    }
}
