use std::collections::VecDeque;

use crawl_logging::{crawl_debug, crawl_info, crawl_warn};
use vacancy_core::{
    update, CrawlOptions, CrawlState, CrawlSummary, DispatchRoute, Effect, ExtractedFields, Msg,
    PendingListing, SearchQuery,
};

use crate::discovery::ListingDiscovery;
use crate::extract::{Dispatch, ExtractionRegistry};
use crate::progress::{CrawlEvent, ProgressSink};
use crate::{CrawlError, FetchError, ListingStore, PageFetcher};

/// Executes the effects of the crawl state machine against a fetcher and a store.
///
/// One effect runs at a time; nothing is fetched while a write is pending.
pub struct CrawlCoordinator<'a> {
    fetcher: &'a dyn PageFetcher,
    store: &'a dyn ListingStore,
    registry: &'a ExtractionRegistry,
    sink: &'a dyn ProgressSink,
    options: CrawlOptions,
}

impl<'a> CrawlCoordinator<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        store: &'a dyn ListingStore,
        registry: &'a ExtractionRegistry,
        sink: &'a dyn ProgressSink,
        options: CrawlOptions,
    ) -> Self {
        Self {
            fetcher,
            store,
            registry,
            sink,
            options,
        }
    }

    /// Visits pending listings until the store has none left.
    pub async fn run_crawl(&self) -> Result<CrawlSummary, CrawlError> {
        self.drive(SearchQuery::default(), false).await
    }

    /// Walks the results pages for `query`, then crawls.
    pub async fn discover_and_crawl(&self, query: SearchQuery) -> Result<CrawlSummary, CrawlError> {
        query.results_url(1)?;
        self.drive(query, true).await
    }

    async fn drive(&self, query: SearchQuery, discover: bool) -> Result<CrawlSummary, CrawlError> {
        let discovery = ListingDiscovery::new(self.fetcher, self.store);
        let state = CrawlState::new(query, self.options.clone());
        let (mut state, effects) = update(state, Msg::SessionStarted { discover });
        let mut queue: VecDeque<Effect> = effects.into();
        let mut last_fetch_error: Option<FetchError> = None;
        // Extracted but not yet committed.
        let mut extracted: Option<(PendingListing, DispatchRoute)> = None;

        while let Some(effect) = queue.pop_front() {
            let msg = match effect {
                Effect::DiscoverPage { page, url } => {
                    let report = discovery.discover_page(&url).await?;
                    crawl_debug!(
                        "Page {}: {} listings added or refreshed, {} skipped",
                        page,
                        report.upserted,
                        report.skipped
                    );
                    self.sink.emit(CrawlEvent::PageDiscovered {
                        page,
                        url,
                        upserted: report.upserted,
                        skipped: report.skipped,
                    });
                    Msg::PageDiscovered {
                        page,
                        upserted: report.upserted,
                        skipped: report.skipped,
                    }
                }
                Effect::QueryNextPending => Msg::NextPending(self.store.next_unvisited().await?),
                Effect::VisitListing(listing) => {
                    last_fetch_error = None;
                    match self.visit(&listing).await {
                        Ok((route, fields)) => {
                            let url = listing.url.clone();
                            extracted = Some((listing, route));
                            Msg::ListingExtracted { url, route, fields }
                        }
                        Err(err) => {
                            let reason = err.to_string();
                            let permanent = err.kind.is_permanent();
                            last_fetch_error = Some(err);
                            Msg::FetchFailed {
                                url: listing.url,
                                reason,
                                permanent,
                            }
                        }
                    }
                }
                Effect::MergeAndMarkVisited { url, fields } => {
                    self.store.merge_and_mark_visited(&url, &fields).await?;
                    if let Some((listing, route)) =
                        extracted.take().filter(|(listing, _)| listing.url == url)
                    {
                        self.emit_processed(&listing, route);
                    }
                    Msg::ListingStored { url }
                }
                Effect::Finish => break,
                Effect::Abort { url, reason } => {
                    return Err(match last_fetch_error.take() {
                        Some(source) => CrawlError::Fetch { url, source },
                        None => CrawlError::Aborted { url, reason },
                    });
                }
            };
            let (next, effects) = update(state, msg);
            state = next;
            queue.extend(effects);
        }

        let summary = state.summary();
        crawl_info!(
            "Crawl finished: {} processed, {} failed, {} without extractor",
            summary.processed,
            summary.failed,
            summary.without_extractor
        );
        self.sink.emit(CrawlEvent::Finished(summary.clone()));
        Ok(summary)
    }

    /// Fetches and extracts one listing. Partners known to have nothing to
    /// extract are not fetched at all. Nothing is reported as processed until
    /// the merge is committed.
    async fn visit(
        &self,
        listing: &PendingListing,
    ) -> Result<(DispatchRoute, ExtractedFields), FetchError> {
        let dispatch = self.registry.dispatch(&listing.partner);
        if let Dispatch::NoExtractor = dispatch {
            crawl_debug!("No extractor for partner {:?} ({})", listing.partner, listing.url);
            return Ok((DispatchRoute::NoExtractor, ExtractedFields::default()));
        }

        let document = match self.fetcher.fetch(&listing.url).await {
            Ok(document) => document,
            Err(err) => {
                crawl_warn!("Fetching {} failed: {}", listing.url, err);
                self.sink.emit(CrawlEvent::ListingFailed {
                    url: listing.url.clone(),
                    kind: err.kind.clone(),
                });
                return Err(err);
            }
        };
        let fields = {
            let page = document.render();
            dispatch.extract(&page)
        };
        crawl_debug!(
            "Extracted {} with {}",
            listing.url,
            dispatch.extractor_name().unwrap_or("-")
        );
        Ok((dispatch.route(), fields))
    }

    fn emit_processed(&self, listing: &PendingListing, route: DispatchRoute) {
        self.sink.emit(CrawlEvent::ListingProcessed {
            url: listing.url.clone(),
            partner: listing.partner.clone(),
            route,
        });
    }
}
