//! Airport name and time-zone lookup.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::domain::{Airport, AirportCode, SegmentDuration, TimeMode, localize, segment_duration};
use crate::timetable::{AirportDto, convert_airports};

/// Immutable airport lookup.
///
/// Built once from the airport list at startup and passed by reference
/// to everything that needs names or time zones.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: Vec<Airport>,
    index: HashMap<AirportCode, usize>,
}

impl AirportDirectory {
    /// Build a directory from domain airports.
    ///
    /// If a code appears twice, the first entry wins.
    pub fn new(airports: Vec<Airport>) -> Self {
        let mut kept = Vec::with_capacity(airports.len());
        let mut index = HashMap::with_capacity(airports.len());

        for airport in airports {
            if index.contains_key(&airport.code) {
                warn!(code = %airport.code, "Duplicate airport in list");
                continue;
            }
            index.insert(airport.code, kept.len());
            kept.push(airport);
        }

        Self {
            airports: kept,
            index,
        }
    }

    /// Build a directory from the API's airport list.
    pub fn from_dtos(airports: Vec<AirportDto>) -> Self {
        Self::new(convert_airports(airports))
    }

    /// Look up an airport by code.
    pub fn get(&self, code: &AirportCode) -> Option<&Airport> {
        self.index.get(code).map(|&i| &self.airports[i])
    }

    /// Look up an airport name by code.
    pub fn name(&self, code: &AirportCode) -> Option<&str> {
        self.get(code).map(|a| a.name.as_str())
    }

    /// The airport name, or the code itself when unknown.
    pub fn name_or_code<'a>(&'a self, code: &'a AirportCode) -> &'a str {
        self.name(code).unwrap_or_else(|| code.as_str())
    }

    /// Look up an airport's time zone.
    pub fn timezone(&self, code: &AirportCode) -> Option<Tz> {
        self.get(code).and_then(|a| a.timezone)
    }

    /// All airports, in list order.
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    /// Number of airports in the directory.
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    /// Check if the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Airports whose name or code contains `query`, ignoring case.
    ///
    /// A blank query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&Airport> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.airports.iter().collect();
        }

        self.airports
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&query)
                    || a.code.as_str().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Flight time of a segment between two airports.
    ///
    /// In LOCAL mode a missing zone degrades to a naive difference; the
    /// result is flagged approximate and a warning is logged.
    pub fn segment_duration(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        from: &AirportCode,
        to: &AirportCode,
        mode: TimeMode,
    ) -> SegmentDuration {
        let duration = segment_duration(start, end, mode, (self.timezone(from), self.timezone(to)));
        if duration.is_approximate() {
            warn!(
                from = %from,
                to = %to,
                "Missing time zone, flight time computed from wall clocks"
            );
        }
        duration
    }

    /// Convert an airport-local wall-clock time to UTC, if the zone is known.
    pub fn to_utc(&self, wall_clock: NaiveDateTime, code: &AirportCode) -> Option<DateTime<Utc>> {
        self.timezone(code).map(|tz| localize(wall_clock, tz))
    }
}
