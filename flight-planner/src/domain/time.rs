//! Time handling for timetable data.
//!
//! The timetable API reports instants as naive wall-clock timestamps. In
//! LOCAL mode each timestamp is the local time at its own airport; in UTC
//! mode every timestamp shares the same reference. This module parses and
//! formats those instants and computes durations between them, converting
//! through the airports' time zones where that is required.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid instant or duration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Display format for canonical instants: `YYYY-MM-DD HH:MM`.
pub const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Naive formats accepted from the API and from persisted data.
const NAIVE_INSTANT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// How instants in a search are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeMode {
    /// Each instant is the wall-clock time at its own airport.
    #[default]
    Local,
    /// All instants share the UTC reference.
    Utc,
}

impl TimeMode {
    /// The identifier used by the timetable API and persisted form state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeMode::Local => "LOCAL",
            TimeMode::Utc => "UTC",
        }
    }

    /// Suffix appended to rendered clock times.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeMode::Local => " LT",
            TimeMode::Utc => "z",
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeMode {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOCAL" => Ok(TimeMode::Local),
            "UTC" => Ok(TimeMode::Utc),
            _ => Err(TimeError::new("time mode must be LOCAL or UTC")),
        }
    }
}

/// Parse a timestamp as reported by the timetable API.
///
/// Offsets are not expected, but if one is present the wall-clock part is
/// kept and the offset dropped.
///
/// # Examples
///
/// ```
/// use flight_planner::domain::parse_instant;
///
/// let t = parse_instant("2025-01-10T08:05:59").unwrap();
/// assert_eq!(t.to_string(), "2025-01-10 08:05:59");
/// assert!(parse_instant("2025-01-10 08:05").is_ok());
/// assert!(parse_instant("10/01/2025").is_err());
/// ```
pub fn parse_instant(s: &str) -> Result<NaiveDateTime, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeError::new("empty instant"));
    }

    for format in NAIVE_INSTANT_FORMATS {
        if let Ok(instant) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(instant);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .map_err(|_| TimeError::new("unrecognised instant format"))
}

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(instant)
}

/// Format an instant as `YYYY-MM-DD HH:MM`, truncating (never rounding)
/// to the minute.
///
/// # Examples
///
/// ```
/// use flight_planner::domain::{format_instant, parse_instant};
///
/// let t = parse_instant("2025-01-10T08:05:59").unwrap();
/// assert_eq!(format_instant(t), "2025-01-10 08:05");
/// ```
pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// A non-negative span of whole minutes, rendered as `HH:MM`.
///
/// Hours are not wrapped at 24, so a 26-hour layover renders as `26:00`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockDuration {
    minutes: u32,
}

impl ClockDuration {
    /// Create a duration from a minute count.
    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// The whole-minute difference `end - start`.
    ///
    /// Partial minutes are discarded. Fails if `end` is before `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_planner::domain::{ClockDuration, parse_instant};
    ///
    /// let arrive = parse_instant("2025-01-10T10:00:00").unwrap();
    /// let depart = parse_instant("2025-01-10T12:05:00").unwrap();
    /// let layover = ClockDuration::between(arrive, depart).unwrap();
    /// assert_eq!(layover.to_string(), "02:05");
    ///
    /// assert!(ClockDuration::between(depart, arrive).is_err());
    /// ```
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, TimeError> {
        let minutes = end.signed_duration_since(start).num_minutes();
        if minutes < 0 {
            return Err(TimeError::new("end is before start"));
        }
        let minutes =
            u32::try_from(minutes).map_err(|_| TimeError::new("duration out of range"))?;
        Ok(Self { minutes })
    }

    /// Parse an `H:M` duration, re-padding both fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use flight_planner::domain::ClockDuration;
    ///
    /// assert_eq!(ClockDuration::parse("2:5").unwrap().to_string(), "02:05");
    /// assert_eq!(ClockDuration::parse("27:30").unwrap().minutes(), 27 * 60 + 30);
    /// assert!(ClockDuration::parse("02:60").is_err());
    /// assert!(ClockDuration::parse("0230").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (hours, minutes) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected H:M format"))?;

        let hours: u32 = parse_digits(hours).ok_or_else(|| TimeError::new("invalid hours"))?;
        let minutes: u32 =
            parse_digits(minutes).ok_or_else(|| TimeError::new("invalid minutes"))?;
        if minutes > 59 {
            return Err(TimeError::new("minutes must be 0-59"));
        }

        hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .map(Self::from_minutes)
            .ok_or_else(|| TimeError::new("duration out of range"))
    }

    /// Total minutes.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}

impl fmt::Display for ClockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Flight time of one segment, rendered as `<h>h <m>m`.
///
/// `approximate` is set when the segment was computed in LOCAL mode
/// without both airports' zones, so the wall-clock difference was used
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentDuration {
    minutes: i64,
    approximate: bool,
}

impl SegmentDuration {
    /// Signed total minutes.
    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Whether time-zone data was missing for this computation.
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }
}

impl fmt::Display for SegmentDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { "-" } else { "" };
        let abs = self.minutes.unsigned_abs();
        write!(f, "{sign}{}h {}m", abs / 60, abs % 60)
    }
}

/// Interpret a wall-clock time in `tz` and return the absolute instant.
///
/// Ambiguous wall times (clocks going back) resolve to the earlier
/// instant. Wall times skipped by a forward jump are moved one hour later.
pub fn localize(wall_clock: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    let resolved = match tz.from_local_datetime(&wall_clock) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => wall_clock
            .checked_add_signed(Duration::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest()),
    };

    match resolved {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&wall_clock),
    }
}

/// Flight time between two instants of one segment.
///
/// In LOCAL mode with both zones known, each wall-clock time is converted
/// to an absolute instant before subtracting. Otherwise the naive values
/// are subtracted directly; under LOCAL mode that result is flagged
/// approximate.
///
/// # Examples
///
/// ```
/// use flight_planner::domain::{TimeMode, parse_instant, segment_duration};
///
/// let dep = parse_instant("2025-01-10T08:00").unwrap();
/// let arr = parse_instant("2025-01-10T12:30").unwrap();
///
/// // Dublin (UTC+0) to Athens (UTC+2): 4h30m on the clocks, 2h30m flying
/// let zones = (Some(chrono_tz::Europe::Dublin), Some(chrono_tz::Europe::Athens));
/// let d = segment_duration(dep, arr, TimeMode::Local, zones);
/// assert_eq!(d.to_string(), "2h 30m");
///
/// let d = segment_duration(dep, arr, TimeMode::Utc, zones);
/// assert_eq!(d.to_string(), "4h 30m");
/// ```
pub fn segment_duration(
    start: NaiveDateTime,
    end: NaiveDateTime,
    mode: TimeMode,
    zones: (Option<Tz>, Option<Tz>),
) -> SegmentDuration {
    match (mode, zones) {
        (TimeMode::Local, (Some(start_tz), Some(end_tz))) => SegmentDuration {
            minutes: localize(end, end_tz)
                .signed_duration_since(localize(start, start_tz))
                .num_minutes(),
            approximate: false,
        },
        (TimeMode::Local, _) => SegmentDuration {
            minutes: end.signed_duration_since(start).num_minutes(),
            approximate: true,
        },
        (TimeMode::Utc, _) => SegmentDuration {
            minutes: end.signed_duration_since(start).num_minutes(),
            approximate: false,
        },
    }
}
