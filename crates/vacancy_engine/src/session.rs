use crawl_logging::{crawl_info, crawl_warn};
use vacancy_core::{CrawlOptions, CrawlSummary, SearchQuery};

use crate::coordinator::CrawlCoordinator;
use crate::extract::ExtractionRegistry;
use crate::progress::ProgressSink;
use crate::{
    CrawlError, FetchSettings, ListingStore, PageFetcher, ReqwestFetcher, SqliteStore,
    StoreError,
};

/// Everything the engine needs to open a session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub database_url: String,
    pub fetch: FetchSettings,
    pub crawl: CrawlOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://vacancies.sqlite?mode=rwc".to_string(),
            fetch: FetchSettings::default(),
            crawl: CrawlOptions::default(),
        }
    }
}

/// What one run does before crawling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    /// Drop every stored listing first.
    pub reset: bool,
    /// Walk the results pages before visiting listings.
    pub discover: bool,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            reset: false,
            discover: true,
        }
    }
}

/// Owns the fetcher, the store and the registry for a single run.
pub struct CrawlSession<F, S> {
    fetcher: F,
    store: S,
    registry: ExtractionRegistry,
    options: CrawlOptions,
}

impl CrawlSession<ReqwestFetcher, SqliteStore> {
    /// Opens the configured database and builds the HTTP client.
    pub async fn open(config: EngineConfig) -> Result<Self, CrawlError> {
        let fetcher = ReqwestFetcher::new(config.fetch).map_err(CrawlError::Client)?;
        let store = SqliteStore::connect(&config.database_url).await?;
        Ok(Self::new(
            fetcher,
            store,
            ExtractionRegistry::with_known_partners(),
            config.crawl,
        ))
    }
}

impl<F: PageFetcher, S: ListingStore> CrawlSession<F, S> {
    pub fn new(fetcher: F, store: S, registry: ExtractionRegistry, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            store,
            registry,
            options,
        }
    }

    /// Runs the plan and closes the store whatever the outcome.
    pub async fn run(
        self,
        query: &SearchQuery,
        plan: RunPlan,
        sink: &dyn ProgressSink,
    ) -> Result<CrawlSummary, CrawlError> {
        let result = self.execute(query, plan, sink).await;
        if let Err(err) = &result {
            crawl_warn!("Session stopped: {}", err);
        }
        self.store.close().await;
        crawl_info!("Session closed");
        result
    }

    async fn execute(
        &self,
        query: &SearchQuery,
        plan: RunPlan,
        sink: &dyn ProgressSink,
    ) -> Result<CrawlSummary, CrawlError> {
        if plan.reset {
            self.reset_store().await?;
        }
        let before = self.store.counts().await?;
        crawl_info!(
            "Starting session: {} listings stored, {} pending",
            before.total,
            before.pending
        );

        let coordinator = CrawlCoordinator::new(
            &self.fetcher,
            &self.store,
            &self.registry,
            sink,
            self.options.clone(),
        );
        if plan.discover {
            coordinator.discover_and_crawl(query.clone()).await
        } else {
            coordinator.run_crawl().await
        }
    }

    async fn reset_store(&self) -> Result<(), StoreError> {
        crawl_info!("Resetting listing store");
        self.store.reset().await
    }
}
