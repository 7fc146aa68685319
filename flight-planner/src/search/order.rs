//! Ordering and filtering of search results.
//!
//! Sorting and the direct-only filter commute: filtering never reorders
//! and sorting is stable, so either order gives the same list.

use crate::domain::FlightRecord;

/// Sort flights by departure, then by arrival at the destination.
///
/// The sort is stable and returns a new list; the input is untouched.
pub fn sort_flights(flights: &[FlightRecord]) -> Vec<FlightRecord> {
    let mut sorted = flights.to_vec();
    sorted.sort_by(|a, b| {
        a.departure
            .cmp(&b.departure)
            .then_with(|| a.arrival.cmp(&b.arrival))
    });
    sorted
}

/// Keep only direct flights, preserving order.
pub fn filter_direct_only(flights: &[FlightRecord]) -> Vec<FlightRecord> {
    flights.iter().filter(|f| f.is_direct()).cloned().collect()
}

/// The list shown to the user: optionally direct-only, always sorted.
pub fn visible_flights(flights: &[FlightRecord], direct_only: bool) -> Vec<FlightRecord> {
    if direct_only {
        sort_flights(&filter_direct_only(flights))
    } else {
        sort_flights(flights)
    }
}
