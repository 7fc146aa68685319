//! Flight search over the timetable API.
//!
//! A search takes a set of origins, a set of destinations and the trip's
//! date ranges, queries every pair and returns normalized flight records.
//! Results are tagged with a generation so callers can drop those of a
//! superseded search.

mod config;
mod order;
mod search;


pub use config::{LayoverBounds, MAX_LAYOVER_HOURS, SearchConfig};
pub use order::{filter_direct_only, sort_flights, visible_flights};
pub use search::{
    Generation, JourneyProvider, SearchError, SearchRequest, SearchResults, SearchTracker,
    Searcher,
};
