//! Vacancy engine: page retrieval, per-partner extraction, listing storage and the crawl loop.
mod coordinator;
mod decode;
mod discovery;
mod error;
mod extract;
mod fetch;
mod page;
mod progress;
mod session;
mod store;
mod types;

pub use coordinator::CrawlCoordinator;
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use discovery::{parse_results_page, DiscoveryReport, ListingDiscovery, ResultsPage};
pub use error::CrawlError;
pub use extract::{
    Dispatch, ExtractionRegistry, Extractor, HeadHunterExtractor, SuperjobExtractor,
    TrudPartnerExtractor, YandexTalentsExtractor,
};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use page::{Element, LookupError, RenderedPage};
pub use progress::{CrawlEvent, NullProgressSink, ProgressSink};
pub use session::{CrawlSession, EngineConfig, RunPlan};
pub use store::{ListingStore, SqliteStore, StoreCounts, StoreError, UpsertOutcome};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchedDocument};
