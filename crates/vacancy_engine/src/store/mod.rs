use vacancy_core::{ExtractedFields, Listing, ListingStub, PendingListing};

mod sqlite;

pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("no listing stored for {0}")]
    UnknownListing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    /// The url already existed; only its update date was refreshed.
    Touched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub total: u64,
    pub pending: u64,
}

/// Durable table of listings keyed by url.
///
/// Every mutation is committed before the call returns.
#[async_trait::async_trait]
pub trait ListingStore: Send + Sync {
    /// Inserts a new pending row, or refreshes the update date of an existing one.
    async fn upsert_stub(&self, stub: &ListingStub) -> Result<UpsertOutcome, StoreError>;

    /// The oldest row not yet visited.
    async fn next_unvisited(&self) -> Result<Option<PendingListing>, StoreError>;

    /// Writes every detail column and sets `visited`.
    async fn merge_and_mark_visited(
        &self,
        url: &str,
        fields: &ExtractedFields,
    ) -> Result<(), StoreError>;

    async fn get(&self, url: &str) -> Result<Option<Listing>, StoreError>;

    async fn counts(&self) -> Result<StoreCounts, StoreError>;

    /// Drops every row and recreates the table.
    async fn reset(&self) -> Result<(), StoreError>;

    async fn close(&self);
}
