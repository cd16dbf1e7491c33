use crawl_logging::{crawl_debug, crawl_warn};
use url::Url;
use vacancy_core::ListingStub;

use crate::page::{Element, RenderedPage};
use crate::{CrawlError, ListingStore, PageFetcher, UpsertOutcome};

const CONTAINER_SELECTOR: &str = "div[class*=number]";

/// Stubs read from one results page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsPage {
    pub stubs: Vec<ListingStub>,
    /// Containers without a usable link.
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Stubs handed to the store, new and already known.
    pub upserted: usize,
    /// Stubs that created a new row.
    pub inserted: usize,
    pub skipped: usize,
    pub final_url: String,
}

/// Reads one search-results page into the store.
pub struct ListingDiscovery<'a> {
    fetcher: &'a dyn PageFetcher,
    store: &'a dyn ListingStore,
}

impl<'a> ListingDiscovery<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, store: &'a dyn ListingStore) -> Self {
        Self { fetcher, store }
    }

    pub async fn discover_page(&self, results_url: &str) -> Result<DiscoveryReport, CrawlError> {
        let document = self
            .fetcher
            .fetch(results_url)
            .await
            .map_err(|source| CrawlError::Fetch {
                url: results_url.to_string(),
                source,
            })?;
        let results = {
            let page = document.render();
            parse_results_page(&page)
        };

        let mut inserted = 0;
        for stub in &results.stubs {
            if self.store.upsert_stub(stub).await? == UpsertOutcome::Inserted {
                inserted += 1;
            }
        }
        crawl_debug!(
            "{}: {} stubs ({} new), {} skipped",
            document.metadata.final_url,
            results.stubs.len(),
            inserted,
            results.skipped
        );

        Ok(DiscoveryReport {
            upserted: results.stubs.len(),
            inserted,
            skipped: results.skipped,
            final_url: document.metadata.final_url,
        })
    }
}

/// Extracts listing stubs from every result container on the page.
pub fn parse_results_page(page: &RenderedPage) -> ResultsPage {
    let base = Url::parse(page.url()).ok();
    let mut results = ResultsPage::default();
    for container in page.find_all(CONTAINER_SELECTOR) {
        match read_container(container, base.as_ref()) {
            Some(stub) => results.stubs.push(stub),
            None => results.skipped += 1,
        }
    }
    results
}

fn read_container(container: Element<'_>, base: Option<&Url>) -> Option<ListingStub> {
    let Ok(link) = container.find_one("a") else {
        crawl_warn!("Result container without a link on {:?}", base.map(Url::as_str));
        return None;
    };
    let Some(url) = link.attribute("href").and_then(|href| resolve_url(href, base)) else {
        crawl_warn!("Result link {:?} has no usable href", link.text());
        return None;
    };
    let text_of = |selector: &str| {
        container
            .find_one(selector)
            .map(|el| el.text())
            .unwrap_or_default()
    };

    Some(ListingStub {
        url: url.into(),
        title: link.text(),
        company: text_of(".institution"),
        location: text_of(".geo-location"),
        partner: link.attribute("partner").unwrap_or_default().trim().to_string(),
    })
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") || lower.starts_with("mailto:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}
