//! Domain types for the flight planner.
//!
//! This module contains the core domain model types that represent
//! validated timetable data and search state. Types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod airport;
mod date_range;
mod record;
mod time;

pub use airport::{Airport, AirportCode, InvalidAirportCode};
pub use date_range::{
    DATE_FORMAT, DateEvent, DateRange, DateRangeState, InvalidTripType, TripType,
    clamp_date_to_min, format_date, is_return_dates_valid, parse_date,
};
pub use record::{FlightRecord, Segment, Stopover};
pub use time::{
    ClockDuration, INSTANT_FORMAT, SegmentDuration, TimeError, TimeMode, format_instant,
    localize, parse_instant, segment_duration, truncate_to_minute,
};
