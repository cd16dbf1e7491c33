use crate::{ExtractedFields, PendingListing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    DiscoverPage { page: u32, url: String },
    QueryNextPending,
    VisitListing(PendingListing),
    MergeAndMarkVisited { url: String, fields: ExtractedFields },
    Finish,
    Abort { url: String, reason: String },
}
