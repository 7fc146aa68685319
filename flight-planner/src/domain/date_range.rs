//! Linked outbound/return date ranges.
//!
//! The outbound range bounds the first search; the return range is only
//! meaningful for return trips and may never start before the outbound
//! range ends. Every user action is expressed as a [`DateEvent`] applied
//! through a pure transition, so one event produces exactly one new state.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by date inputs and persisted form state.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date; empty or malformed input yields `None`.
///
/// # Examples
///
/// ```
/// use flight_planner::domain::parse_date;
///
/// assert!(parse_date("2025-01-10").is_some());
/// assert!(parse_date("").is_none());
/// assert!(parse_date("2025-02-30").is_none());
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Format an optional date, using the empty string for `None`.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// One-way or return trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripType {
    #[default]
    #[serde(rename = "oneway")]
    OneWay,
    #[serde(rename = "return")]
    Return,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "oneway",
            TripType::Return => "return",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown trip type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trip type: {0}")]
pub struct InvalidTripType(String);

impl FromStr for TripType {
    type Err = InvalidTripType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "oneway" => Ok(TripType::OneWay),
            "return" => Ok(TripType::Return),
            other => Err(InvalidTripType(other.to_string())),
        }
    }
}

/// An inclusive range of travel dates. Either bound may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// A range covering a single day (or nothing, for `None`).
    pub fn single(day: Option<NaiveDate>) -> Self {
        Self { from: day, to: day }
    }

    /// Picking a new start date collapses the range to that day.
    ///
    /// The previous range is discarded; widening is a separate end-date
    /// change.
    pub fn apply_from_change(&self, new_from: Option<NaiveDate>) -> Self {
        Self::single(new_from)
    }

    /// Set the end date, collapsing to a single day if it precedes `from`.
    ///
    /// Afterwards `from <= to` holds whenever both are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_planner::domain::{DateRange, parse_date};
    ///
    /// let range = DateRange::new(parse_date("2025-01-10"), None);
    ///
    /// let earlier = range.apply_to_change(parse_date("2025-01-09"));
    /// assert_eq!(earlier, DateRange::single(parse_date("2025-01-09")));
    ///
    /// let later = range.apply_to_change(parse_date("2025-01-15"));
    /// assert_eq!(later, DateRange::new(parse_date("2025-01-10"), parse_date("2025-01-15")));
    /// ```
    pub fn apply_to_change(&self, new_to: Option<NaiveDate>) -> Self {
        match (self.from, new_to) {
            (Some(from), Some(to)) if to < from => Self::single(new_to),
            _ => Self {
                from: self.from,
                to: new_to,
            },
        }
    }

    /// The earliest date a dependent range may use: `to`, else `from`.
    pub fn floor(&self) -> Option<NaiveDate> {
        self.to.or(self.from)
    }

    /// True if both bounds are unset.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Both bounds, if set.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.from?, self.to?))
    }

    /// True if either set bound is before `floor`.
    fn reaches_below(&self, floor: NaiveDate) -> bool {
        self.from.is_some_and(|d| d < floor) || self.to.is_some_and(|d| d < floor)
    }
}

/// Raise `value` to `floor` if it is earlier. Unset inputs pass through.
pub fn clamp_date_to_min(value: Option<NaiveDate>, floor: Option<NaiveDate>) -> Option<NaiveDate> {
    match (value, floor) {
        (Some(v), Some(min)) if v < min => Some(min),
        _ => value,
    }
}

/// Whether the return dates allow a search to be submitted.
///
/// One-way trips are always valid. Return trips need both dates, neither
/// before `floor`, and `to` not before `from`.
pub fn is_return_dates_valid(
    trip_type: TripType,
    return_range: &DateRange,
    floor: Option<NaiveDate>,
) -> bool {
    if trip_type == TripType::OneWay {
        return true;
    }

    let Some((from, to)) = return_range.bounds() else {
        return false;
    };

    match floor {
        Some(floor) if from < floor || to < floor => false,
        _ => to >= from,
    }
}

/// A discrete change made by the user to the search dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEvent {
    OutboundFrom(Option<NaiveDate>),
    OutboundTo(Option<NaiveDate>),
    ReturnFrom(Option<NaiveDate>),
    ReturnTo(Option<NaiveDate>),
    TripType(TripType),
}

/// The outbound range, the dependent return range and the trip type.
///
/// The return range is kept while the trip is one-way so that switching
/// back restores it, but it only takes part in a search for return trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeState {
    pub trip_type: TripType,
    pub outbound: DateRange,
    pub inbound: DateRange,
}

impl DateRangeState {
    pub fn new(trip_type: TripType, outbound: DateRange, inbound: DateRange) -> Self {
        Self {
            trip_type,
            outbound,
            inbound,
        }
    }

    /// Rebuild a state from saved ranges.
    ///
    /// Unlike the return events, the saved return dates are not raised to
    /// the floor: for return trips a saved range reaching below it is
    /// cleared.
    pub fn restore(trip_type: TripType, outbound: DateRange, inbound: DateRange) -> Self {
        Self::new(trip_type, outbound, inbound).with_floor_enforced()
    }

    /// Minimum allowed return date.
    pub fn floor(&self) -> Option<NaiveDate> {
        self.outbound.floor()
    }

    /// The return range, present only for return trips.
    pub fn return_range(&self) -> Option<&DateRange> {
        match self.trip_type {
            TripType::Return => Some(&self.inbound),
            TripType::OneWay => None,
        }
    }

    /// Whether the return dates allow submission.
    pub fn return_dates_valid(&self) -> bool {
        is_return_dates_valid(self.trip_type, &self.inbound, self.floor())
    }

    /// Apply one event and return the resulting state.
    ///
    /// When the outbound range moves so that the return range would start
    /// before the new floor, the return dates are cleared rather than
    /// moved, forcing the user to pick them again.
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_planner::domain::{DateEvent, DateRangeState, TripType, parse_date};
    ///
    /// let state = DateRangeState::default()
    ///     .apply(DateEvent::TripType(TripType::Return))
    ///     .apply(DateEvent::OutboundFrom(parse_date("2025-01-10")))
    ///     .apply(DateEvent::ReturnFrom(parse_date("2025-01-12")));
    /// assert_eq!(state.inbound.from, parse_date("2025-01-12"));
    ///
    /// // Moving the outbound end past the return start clears the return dates
    /// let state = state.apply(DateEvent::OutboundTo(parse_date("2025-01-14")));
    /// assert!(state.inbound.is_empty());
    /// ```
    pub fn apply(&self, event: DateEvent) -> Self {
        match event {
            DateEvent::OutboundFrom(value) => Self {
                outbound: self.outbound.apply_from_change(value),
                ..*self
            }
            .with_floor_enforced(),
            DateEvent::OutboundTo(value) => Self {
                outbound: self.outbound.apply_to_change(value),
                ..*self
            }
            .with_floor_enforced(),
            DateEvent::ReturnFrom(value) => {
                let value = clamp_date_to_min(value, self.floor());
                Self {
                    inbound: self.inbound.apply_from_change(value),
                    ..*self
                }
            }
            DateEvent::ReturnTo(value) => {
                let value = clamp_date_to_min(value, self.floor());
                let next = self.inbound.apply_to_change(value);
                Self {
                    inbound: DateRange::new(next.from.or(value), next.to),
                    ..*self
                }
            }
            DateEvent::TripType(trip_type) => Self { trip_type, ..*self }.with_floor_enforced(),
        }
    }

    fn with_floor_enforced(self) -> Self {
        if self.trip_type != TripType::Return {
            return self;
        }
        match self.floor() {
            Some(floor) if self.inbound.reaches_below(floor) => Self {
                inbound: DateRange::default(),
                ..self
            },
            _ => self,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_date() -> impl Strategy<Value = Option<NaiveDate>> {
        prop::option::of((0i64..730).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(offset)
        }))
    }

    fn any_range() -> impl Strategy<Value = DateRange> {
        (any_date(), any_date()).prop_map(|(a, b)| match (a, b) {
            (Some(x), Some(y)) if y < x => DateRange::new(b, a),
            _ => DateRange::new(a, b),
        })
    }

    fn any_event() -> impl Strategy<Value = DateEvent> {
        prop_oneof![
            any_date().prop_map(DateEvent::OutboundFrom),
            any_date().prop_map(DateEvent::OutboundTo),
            any_date().prop_map(DateEvent::ReturnFrom),
            any_date().prop_map(DateEvent::ReturnTo),
            Just(DateEvent::TripType(TripType::Return)),
            Just(DateEvent::TripType(TripType::OneWay)),
        ]
    }

    fn ordered(range: &DateRange) -> bool {
        match range.bounds() {
            Some((from, to)) => from <= to,
            None => true,
        }
    }

    proptest! {
        /// A start-date change always yields a single-day range
        #[test]
        fn from_change_is_single_day(r in any_range(), day in any_date()) {
            let next = r.apply_from_change(day);
            prop_assert_eq!(next.from, day);
            prop_assert_eq!(next.to, day);
        }

        /// An end-date change always keeps from <= to
        #[test]
        fn to_change_keeps_order(r in any_range(), day in any_date()) {
            let next = r.apply_to_change(day);
            prop_assert!(ordered(&next));
            prop_assert_eq!(next.to, day);
        }

        /// The clamped value is never below the floor
        #[test]
        fn clamp_respects_floor(value in any_date(), floor in any_date()) {
            let clamped = clamp_date_to_min(value, floor);
            if let (Some(c), Some(f)) = (clamped, floor) {
                prop_assert!(c >= f);
            }
            prop_assert_eq!(clamped.is_some(), value.is_some());
        }

        /// Any event sequence keeps both ranges ordered, and keeps the
        /// return range at or above the floor for return trips
        #[test]
        fn events_preserve_invariants(events in prop::collection::vec(any_event(), 0..20)) {
            let mut state = DateRangeState::default();
            for event in events {
                state = state.apply(event);
                prop_assert!(ordered(&state.outbound));
                if let Some(inbound) = state.return_range() {
                    prop_assert!(ordered(inbound));
                    if let Some(floor) = state.floor() {
                        prop_assert!(!inbound.reaches_below(floor));
                    }
                }
            }
        }

        /// The gate agrees with the individual checks
        #[test]
        fn gate_implies_constraints(r in any_range(), floor in any_date()) {
            if is_return_dates_valid(TripType::Return, &r, floor) {
                let (from, to) = r.bounds().unwrap();
                prop_assert!(from <= to);
                if let Some(f) = floor {
                    prop_assert!(from >= f);
                }
            }
        }
    }
}
