//! Timetable API client and journey normalization.
//!
//! This module provides an HTTP client for the airline timetable API and
//! the conversion of its journey results into canonical flight records.
//!
//! Key characteristics of the API:
//! - Journeys carry one flight (direct) or more (connecting); only direct
//!   and one-stop journeys are supported
//! - Instants are naive timestamps, in airport-local time or UTC depending
//!   on the requested `timeMode`
//! - One request covers a single origin/destination pair

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, JourneyQuery, TimetableClient, TimetableConfig};
pub use convert::{ConversionError, convert_airports, convert_journey, normalize};
pub use error::TimetableError;
pub use types::{AirportDto, FlightDto, JourneyDto};
