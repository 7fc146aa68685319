//! Flat string projection of flight records for tables and export.

use prettytable::{Cell, Row, Table};
use serde::Serialize;

use crate::domain::{FlightRecord, TimeMode, format_instant};

/// Column headings of the results table.
pub const TABLE_HEADERS: [&str; 9] = [
    "STD", "ORIGIN", "STA", "STOP", "LAYOVER", "STD_STOP", "DEST", "STA_DEST", "TOTAL",
];

/// Positions within [`FlightRow::columns`] that hold clock times.
const TIME_COLUMNS: [usize; 4] = [0, 2, 5, 7];

/// One flight record as named string fields.
///
/// Instants are `YYYY-MM-DD HH:MM`. The stop fields (`stop`, `sta`,
/// `layover`, `std_stop`) are all empty for a direct flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FlightRow {
    pub std: String,
    pub origin: String,
    pub sta: String,
    pub stop: String,
    pub layover: String,
    pub std_stop: String,
    pub dest: String,
    pub sta_dest: String,
    pub total_duration: String,
    pub departure_date: String,
    pub arrival_date: String,
    pub time_mode: TimeMode,
}

impl FlightRow {
    /// Project a record into its string fields.
    pub fn from_record(record: &FlightRecord) -> Self {
        let (stop, sta, layover, std_stop) = match &record.stopover {
            Some(s) => (
                s.airport.to_string(),
                format_instant(s.arrival),
                s.layover.to_string(),
                format_instant(s.departure),
            ),
            None => Default::default(),
        };

        Self {
            std: format_instant(record.departure),
            origin: record.origin.to_string(),
            sta,
            stop,
            layover,
            std_stop,
            dest: record.destination.to_string(),
            sta_dest: format_instant(record.arrival),
            total_duration: record.total_duration.to_string(),
            departure_date: format_instant(record.journey_departure),
            arrival_date: format_instant(record.journey_arrival),
            time_mode: record.time_mode,
        }
    }

    /// The nine table columns, in [`TABLE_HEADERS`] order.
    pub fn columns(&self) -> [&str; 9] {
        [
            &self.std,
            &self.origin,
            &self.sta,
            &self.stop,
            &self.layover,
            &self.std_stop,
            &self.dest,
            &self.sta_dest,
            &self.total_duration,
        ]
    }

    /// Table columns with the time-mode suffix on every non-empty time.
    pub fn display_columns(&self) -> [String; 9] {
        let suffix = self.time_mode.suffix();
        let columns = self.columns();
        std::array::from_fn(|i| {
            let value = columns[i];
            if TIME_COLUMNS.contains(&i) && !value.is_empty() {
                format!("{}{}", value, suffix)
            } else {
                value.to_string()
            }
        })
    }
}

impl From<&FlightRecord> for FlightRow {
    fn from(record: &FlightRecord) -> Self {
        Self::from_record(record)
    }
}

/// Build the results table for a list of rows.
pub fn flight_table(rows: &[FlightRow]) -> Table {
    let mut table = Table::new();
    table.set_titles(Row::new(
        TABLE_HEADERS
            .iter()
            .map(|h| Cell::new(h).style_spec("b"))
            .collect(),
    ));

    for row in rows {
        table.add_row(Row::new(
            row.display_columns().iter().map(|c| Cell::new(c)).collect(),
        ));
    }

    table
}
