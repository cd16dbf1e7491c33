use crate::{DispatchRoute, ExtractedFields, PendingListing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Session begins; `discover` selects whether results pages are walked first.
    SessionStarted { discover: bool },
    /// One results page was processed.
    PageDiscovered {
        page: u32,
        upserted: usize,
        skipped: usize,
    },
    /// Answer to `Effect::QueryNextPending`.
    NextPending(Option<PendingListing>),
    /// The current listing's page was read by its extractor.
    ListingExtracted {
        url: String,
        route: DispatchRoute,
        fields: ExtractedFields,
    },
    /// The current listing's page could not be fetched. `permanent` failures
    /// (gone, malformed url, not a page) will not heal on a later run.
    FetchFailed {
        url: String,
        reason: String,
        permanent: bool,
    },
    /// The merge for the current listing was committed.
    ListingStored { url: String },
}
