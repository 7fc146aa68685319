//! Presentation projections of flight records.
//!
//! Records stay typed throughout the crate; the string shapes needed by a
//! results table, JSON export or a tile are computed here.

mod row;
mod tile;

pub use row::{FlightRow, TABLE_HEADERS, flight_table};
pub use tile::{DAY_FORMAT, TileView, TilePoint, TileStopover, format_day};
pub(crate) use tile::clock_time;
