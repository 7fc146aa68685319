//! Airport reference data.
//!
//! Provides IATA code → name and code → time zone lookups, built once
//! from the timetable API's active-airport list.

mod directory;

pub use directory::AirportDirectory;
