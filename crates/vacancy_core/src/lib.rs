//! Vacancy core: listing data model, search queries and the pure crawl state machine.
mod effect;
mod listing;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use listing::{
    join_skills, DispatchRoute, ExtractedFields, Listing, ListingStub, PendingListing, VisitState,
};
pub use msg::Msg;
pub use query::{QueryError, SearchQuery};
pub use state::{CrawlOptions, CrawlState, FetchFailurePolicy, Phase};
pub use update::update;
pub use view_model::CrawlSummary;
