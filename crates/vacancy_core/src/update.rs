use crate::{CrawlState, DispatchRoute, Effect, ExtractedFields, FetchFailurePolicy, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not fit the current phase are ignored. Once the state is
/// `Finished` or `Aborted` nothing moves it again.
pub fn update(mut state: CrawlState, msg: Msg) -> (CrawlState, Vec<Effect>) {
    if state.is_terminal() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::SessionStarted { discover } => {
            if state.phase() != Phase::Idle {
                return (state, Vec::new());
            }
            if discover && state.options().max_pages > 0 {
                discover_page(&mut state, 1)
            } else {
                start_crawl(&mut state)
            }
        }
        Msg::PageDiscovered {
            page,
            upserted,
            skipped,
        } => match state.phase() {
            Phase::Discovering { page: expected } if expected == page => {
                state.record_page(upserted, skipped);
                // A page without containers is the end of pagination.
                let exhausted = upserted + skipped == 0;
                if exhausted || page >= state.options().max_pages {
                    start_crawl(&mut state)
                } else {
                    discover_page(&mut state, page + 1)
                }
            }
            _ => Vec::new(),
        },
        Msg::NextPending(next) => {
            if state.phase() != Phase::Crawling || state.current().is_some() {
                return (state, Vec::new());
            }
            match next {
                Some(listing) => {
                    state.begin_listing(listing.clone());
                    vec![Effect::VisitListing(listing)]
                }
                None => {
                    state.set_phase(Phase::Finished);
                    vec![Effect::Finish]
                }
            }
        }
        Msg::ListingExtracted { url, route, fields } => {
            if !is_in_flight(&state, &url) {
                return (state, Vec::new());
            }
            let fields = if route == DispatchRoute::NoExtractor {
                state.record_without_extractor();
                ExtractedFields::default()
            } else {
                fields
            };
            vec![Effect::MergeAndMarkVisited { url, fields }]
        }
        Msg::FetchFailed {
            url,
            reason,
            permanent,
        } => {
            if !is_in_flight(&state, &url) {
                return (state, Vec::new());
            }
            let policy = state.options().fetch_failure_policy;
            if policy == FetchFailurePolicy::Abort && !permanent {
                state.set_phase(Phase::Aborted);
                vec![Effect::Abort { url, reason }]
            } else {
                state.record_failure();
                vec![Effect::MergeAndMarkVisited {
                    url,
                    fields: ExtractedFields::default(),
                }]
            }
        }
        Msg::ListingStored { url } => {
            if !is_in_flight(&state, &url) {
                return (state, Vec::new());
            }
            state.finish_listing();
            vec![Effect::QueryNextPending]
        }
    };

    (state, effects)
}

fn is_in_flight(state: &CrawlState, url: &str) -> bool {
    state.phase() == Phase::Crawling && state.is_current(url)
}

fn start_crawl(state: &mut CrawlState) -> Vec<Effect> {
    state.set_phase(Phase::Crawling);
    vec![Effect::QueryNextPending]
}

fn discover_page(state: &mut CrawlState, page: u32) -> Vec<Effect> {
    match state.query().results_url(page) {
        Ok(url) => {
            state.set_phase(Phase::Discovering { page });
            vec![Effect::DiscoverPage {
                page,
                url: url.into(),
            }]
        }
        Err(err) => {
            let url = state.query().base_url.clone();
            state.set_phase(Phase::Aborted);
            vec![Effect::Abort {
                url,
                reason: err.to_string(),
            }]
        }
    }
}
