//! Card-style view of a single flight.

use std::fmt;

use chrono::NaiveDateTime;

use crate::airports::AirportDirectory;
use crate::domain::{AirportCode, FlightRecord, Segment};

/// Day format used on tiles and in calendar descriptions: `Fri, Jan 10`.
pub const DAY_FORMAT: &str = "%a, %b %-d";

/// Format the day of an instant, e.g. `Fri, Jan 10`.
pub fn format_day(instant: NaiveDateTime) -> String {
    instant.format(DAY_FORMAT).to_string()
}

/// Clock time of an instant with the time-mode suffix, e.g. `08:00 LT`.
pub(crate) fn clock_time(instant: NaiveDateTime, suffix: &str) -> String {
    format!("{}{}", instant.format("%H:%M"), suffix)
}

/// A timed call at an airport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePoint {
    pub time: String,
    pub name: String,
    pub code: AirportCode,
}

impl TilePoint {
    fn new(
        instant: NaiveDateTime,
        suffix: &str,
        code: AirportCode,
        directory: &AirportDirectory,
    ) -> Self {
        Self {
            time: clock_time(instant, suffix),
            name: directory.name_or_code(&code).to_string(),
            code,
        }
    }
}

impl fmt::Display for TilePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<9} {} ({})", self.time, self.name, self.code)
    }
}

/// The stop of a one-stop flight, with both segments' flight times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileStopover {
    /// Flight time of the first segment
    pub first_flight: String,
    pub arrival: TilePoint,
    pub layover: String,
    pub departure: TilePoint,
    /// Flight time of the second segment
    pub second_flight: String,
}

/// View model for one flight tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub depart_day: String,
    pub arrive_day: String,
    pub total_duration: String,
    pub departure: TilePoint,
    pub stopover: Option<TileStopover>,
    pub arrival: TilePoint,
}

impl TileView {
    /// Build the tile for a record, resolving names and zones through the
    /// directory.
    pub fn from_record(record: &FlightRecord, directory: &AirportDirectory) -> Self {
        let suffix = record.time_mode.suffix();
        let flight_time = |segment: Segment| {
            directory
                .segment_duration(
                    segment.departure,
                    segment.arrival,
                    &segment.from,
                    &segment.to,
                    record.time_mode,
                )
                .to_string()
        };

        let stopover = match (&record.stopover, record.second_segment()) {
            (Some(stop), Some(second)) => Some(TileStopover {
                first_flight: flight_time(record.first_segment()),
                arrival: TilePoint::new(stop.arrival, suffix, stop.airport, directory),
                layover: stop.layover.to_string(),
                departure: TilePoint::new(stop.departure, suffix, stop.airport, directory),
                second_flight: flight_time(second),
            }),
            _ => None,
        };

        Self {
            depart_day: format_day(record.journey_departure),
            arrive_day: format_day(record.journey_arrival),
            total_duration: record.total_duration.to_string(),
            departure: TilePoint::new(record.departure, suffix, record.origin, directory),
            stopover,
            arrival: TilePoint::new(record.arrival, suffix, record.destination, directory),
        }
    }
}

impl fmt::Display for TileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Depart: {}    Duration: {}",
            self.depart_day, self.total_duration
        )?;
        writeln!(f, "  {}", self.departure)?;

        if let Some(stop) = &self.stopover {
            writeln!(f, "  {:<9} {}", "", stop.first_flight)?;
            writeln!(f, "  {}", stop.arrival)?;
            writeln!(
                f,
                "  {} stopover in {} ({})",
                stop.layover, stop.arrival.name, stop.arrival.code
            )?;
            writeln!(f, "  {}", stop.departure)?;
            writeln!(f, "  {:<9} {}", "", stop.second_flight)?;
        }

        writeln!(f, "  {}", self.arrival)?;
        write!(f, "Arrive: {}", self.arrive_day)
    }
}
