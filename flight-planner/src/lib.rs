//! Multi-airport flight planner.
//!
//! Searches an airline timetable for direct and one-stop flights between
//! any of a set of origins and any of a set of destinations, over a window
//! of departure dates and optionally a return window, and presents the
//! results as a table, tiles, booking links and calendar links.

pub mod airports;
pub mod domain;
pub mod links;
pub mod present;
pub mod search;
pub mod store;
pub mod timetable;
