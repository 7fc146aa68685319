//! Flight search across sets of origins and destinations.
//!
//! A search issues one timetable query per origin/destination pair (and,
//! for return trips, per destination/origin pair over the return window),
//! then normalizes everything that came back. Each search is tagged with a
//! generation so that a slow, superseded search cannot replace the results
//! of a newer one.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use futures::future::try_join_all;
use tracing::debug;

use crate::domain::{AirportCode, DateRangeState, FlightRecord, TripType};
use crate::timetable::{JourneyDto, JourneyQuery, TimetableClient, TimetableError, normalize};

use super::config::SearchConfig;

/// Error from a flight search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Failed to fetch journeys for one pair
    #[error("failed to fetch journeys {origin} -> {destination}: {message}")]
    FetchError {
        origin: AirportCode,
        destination: AirportCode,
        message: String,
    },

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(&'static str),

    /// Return dates missing, reversed or before the outbound dates
    #[error("return dates are required and must be on/after the departure dates")]
    InvalidReturnDates,
}

/// Trait for providing raw journeys.
///
/// This abstraction allows searches to be tested with mock data.
pub trait JourneyProvider {
    /// Get journeys for one origin/destination pair.
    fn journeys(
        &self,
        query: &JourneyQuery,
    ) -> impl Future<Output = Result<Vec<JourneyDto>, TimetableError>> + Send;
}

impl JourneyProvider for TimetableClient {
    fn journeys(
        &self,
        query: &JourneyQuery,
    ) -> impl Future<Output = Result<Vec<JourneyDto>, TimetableError>> + Send {
        self.fetch_journeys(query)
    }
}

/// Request for a flight search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub origins: Vec<AirportCode>,
    pub destinations: Vec<AirportCode>,
    pub dates: DateRangeState,
    pub config: SearchConfig,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(
        origins: Vec<AirportCode>,
        destinations: Vec<AirportCode>,
        dates: DateRangeState,
        config: SearchConfig,
    ) -> Self {
        Self {
            origins,
            destinations,
            dates,
            config,
        }
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.origins.is_empty() {
            return Err(SearchError::InvalidRequest("no origins selected"));
        }

        if self.destinations.is_empty() {
            return Err(SearchError::InvalidRequest("no destinations selected"));
        }

        if self.dates.outbound.bounds().is_none() {
            return Err(SearchError::InvalidRequest(
                "departure dates are required",
            ));
        }

        if !self.dates.return_dates_valid() {
            return Err(SearchError::InvalidReturnDates);
        }

        Ok(())
    }

    /// One query per origin/destination pair over the outbound window.
    pub fn outbound_queries(&self) -> Vec<JourneyQuery> {
        match self.dates.outbound.bounds() {
            Some(window) => self.queries(window, false),
            None => Vec::new(),
        }
    }

    /// One query per destination/origin pair over the return window.
    ///
    /// Empty for one-way trips.
    pub fn return_queries(&self) -> Vec<JourneyQuery> {
        match self.dates.return_range().and_then(|r| r.bounds()) {
            Some(window) => self.queries(window, true),
            None => Vec::new(),
        }
    }

    fn queries(&self, (date_from, date_to): (NaiveDate, NaiveDate), reversed: bool) -> Vec<JourneyQuery> {
        self.origins
            .iter()
            .flat_map(|&origin| {
                self.destinations.iter().map(move |&destination| {
                    let (from, to) = if reversed {
                        (destination, origin)
                    } else {
                        (origin, destination)
                    };
                    JourneyQuery {
                        origin: from,
                        destination: to,
                        date_from,
                        date_to,
                        time_mode: self.config.time_mode,
                        layover_from: self.config.layover.from(),
                        layover_to: self.config.layover.to(),
                    }
                })
            })
            .collect()
    }

    /// Heading for the outbound results.
    pub fn outbound_title(&self) -> String {
        format!(
            "Outbound: {} <-> {}",
            route_list(&self.origins),
            route_list(&self.destinations)
        )
    }

    /// Heading for the return results, for return trips.
    pub fn return_title(&self) -> Option<String> {
        (self.dates.trip_type == TripType::Return).then(|| {
            format!(
                "Return: {} <-> {}",
                route_list(&self.destinations),
                route_list(&self.origins)
            )
        })
    }
}

fn route_list(codes: &[AirportCode]) -> String {
    codes
        .iter()
        .map(AirportCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Identifies one search among those started by a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Hands out search generations and tells which one is current.
#[derive(Debug, Clone, Default)]
pub struct SearchTracker {
    latest: Arc<AtomicU64>,
}

impl SearchTracker {
    /// Create a tracker with no searches started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, superseding all earlier ones.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `generation` is the most recently started search.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    /// Pass results through only if they belong to the current search.
    pub fn accept(&self, results: SearchResults) -> Option<SearchResults> {
        if self.is_current(results.generation) {
            Some(results)
        } else {
            debug!(
                generation = results.generation.0,
                latest = self.latest.load(Ordering::SeqCst),
                "Discarding results of superseded search"
            );
            None
        }
    }
}

/// Normalized results of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub generation: Generation,
    pub outbound: Vec<FlightRecord>,
    /// Present for return trips
    pub inbound: Option<Vec<FlightRecord>>,
}

/// Runs searches against a journey provider.
#[derive(Debug, Clone)]
pub struct Searcher<P> {
    provider: P,
    tracker: SearchTracker,
}

impl<P: JourneyProvider> Searcher<P> {
    /// Create a searcher with a fresh tracker.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            tracker: SearchTracker::new(),
        }
    }

    /// The underlying journey provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The tracker used to tag this searcher's results.
    pub fn tracker(&self) -> &SearchTracker {
        &self.tracker
    }

    /// Run a search.
    ///
    /// All queries run concurrently; any failed query fails the search.
    /// The results carry the generation this search was given, and should
    /// be passed through [`SearchTracker::accept`] before display.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResults, SearchError> {
        request.validate()?;

        let generation = self.tracker.begin();
        let outbound_queries = request.outbound_queries();
        let return_queries = request.return_queries();

        debug!(
            generation = generation.0,
            outbound = outbound_queries.len(),
            inbound = return_queries.len(),
            "Starting flight search"
        );

        let (outbound, inbound) = futures::try_join!(
            self.fetch_all(&outbound_queries),
            self.fetch_all(&return_queries)
        )?;

        let time_mode = request.config.time_mode;
        let inbound = (request.dates.trip_type == TripType::Return)
            .then(|| normalize(&inbound, time_mode));

        Ok(SearchResults {
            generation,
            outbound: normalize(&outbound, time_mode),
            inbound,
        })
    }

    async fn fetch_all(&self, queries: &[JourneyQuery]) -> Result<Vec<JourneyDto>, SearchError> {
        let responses = try_join_all(queries.iter().map(|query| async move {
            self.provider
                .journeys(query)
                .await
                .map_err(|e| SearchError::FetchError {
                    origin: query.origin,
                    destination: query.destination,
                    message: e.to_string(),
                })
        }))
        .await?;

        Ok(responses.into_iter().flatten().collect())
    }
}
