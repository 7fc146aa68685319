//! Canonical flight records.
//!
//! A `FlightRecord` is one bookable itinerary of one or two legs, as shown
//! to the user. All instants are truncated to the minute and are expressed
//! in the record's `TimeMode`.

use chrono::NaiveDateTime;

use super::{AirportCode, ClockDuration, TimeMode};

/// The intermediate stop of a one-stop itinerary.
///
/// Either all of these fields are known or the itinerary is direct, so the
/// stop is modelled as a single optional value on `FlightRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopover {
    /// Airport where the first leg arrives and the second departs
    pub airport: AirportCode,
    /// Arrival of the first leg (STA at the stop)
    pub arrival: NaiveDateTime,
    /// Time between arrival and onward departure
    pub layover: ClockDuration,
    /// Departure of the second leg (STD from the stop)
    pub departure: NaiveDateTime,
}

/// One non-stop segment of a record, derived for display and links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: AirportCode,
    pub departure: NaiveDateTime,
    pub to: AirportCode,
    pub arrival: NaiveDateTime,
}

/// A normalized itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    pub time_mode: TimeMode,
    pub origin: AirportCode,
    /// Departure from the origin (STD)
    pub departure: NaiveDateTime,
    pub stopover: Option<Stopover>,
    pub destination: AirportCode,
    /// Arrival at the destination (STA_DEST)
    pub arrival: NaiveDateTime,
    pub total_duration: ClockDuration,
    /// Journey-level departure as reported alongside the legs
    pub journey_departure: NaiveDateTime,
    /// Journey-level arrival as reported alongside the legs
    pub journey_arrival: NaiveDateTime,
}

impl FlightRecord {
    /// Returns true if the itinerary has no stop.
    pub fn is_direct(&self) -> bool {
        self.stopover.is_none()
    }

    /// The stop airport, if any.
    pub fn stop(&self) -> Option<AirportCode> {
        self.stopover.as_ref().map(|s| s.airport)
    }

    /// The first segment: origin to the stop, or to the destination when direct.
    pub fn first_segment(&self) -> Segment {
        match &self.stopover {
            Some(stop) => Segment {
                from: self.origin,
                departure: self.departure,
                to: stop.airport,
                arrival: stop.arrival,
            },
            None => Segment {
                from: self.origin,
                departure: self.departure,
                to: self.destination,
                arrival: self.arrival,
            },
        }
    }

    /// The second segment, from the stop to the destination.
    pub fn second_segment(&self) -> Option<Segment> {
        self.stopover.as_ref().map(|stop| Segment {
            from: stop.airport,
            departure: stop.departure,
            to: self.destination,
            arrival: self.arrival,
        })
    }

    /// Segment by index: 0 is the first, 1 the second (one-stop only).
    pub fn segment(&self, index: usize) -> Option<Segment> {
        match index {
            0 => Some(self.first_segment()),
            1 => self.second_segment(),
            _ => None,
        }
    }

    /// All segments in travel order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        std::iter::once(self.first_segment()).chain(self.second_segment())
    }
}
