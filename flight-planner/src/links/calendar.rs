//! Calendar-event links for flights.

use chrono::NaiveDateTime;
use reqwest::Url;

use crate::airports::AirportDirectory;
use crate::domain::{FlightRecord, TimeMode};
use crate::present::{clock_time, format_day};

use super::LinkError;

const CALENDAR_URL: &str = "https://www.google.com/calendar/render";

/// Timestamp format of the `dates` parameter.
const EVENT_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Link that opens a pre-filled calendar event for a flight.
///
/// The event spans the journey's departure and arrival. In LOCAL mode both
/// are converted to UTC through the origin and destination zones; if either
/// zone is unknown the wall-clock times are used unchanged.
pub fn calendar_link(record: &FlightRecord, directory: &AirportDirectory) -> Result<Url, LinkError> {
    let origin = directory.name_or_code(&record.origin);
    let destination = directory.name_or_code(&record.destination);

    let mut title = format!("Flight {} to {}", origin, destination);
    if let Some(stop) = &record.stopover {
        title.push_str(" via ");
        title.push_str(directory.name_or_code(&stop.airport));
    }

    let (start, end) = event_span(record, directory);
    let dates = format!(
        "{}Z/{}Z",
        start.format(EVENT_TIME_FORMAT),
        end.format(EVENT_TIME_FORMAT)
    );

    let location = format!("Departure: {}, Arrival: {}", origin, destination);

    Url::parse_with_params(
        CALENDAR_URL,
        [
            ("action", "TEMPLATE"),
            ("text", title.as_str()),
            ("dates", dates.as_str()),
            ("details", event_details(record, directory).as_str()),
            ("location", location.as_str()),
        ],
    )
    .map_err(|e| LinkError::InvalidUrl(e.to_string()))
}

fn event_span(record: &FlightRecord, directory: &AirportDirectory) -> (NaiveDateTime, NaiveDateTime) {
    let naive = (record.journey_departure, record.journey_arrival);
    if record.time_mode != TimeMode::Local {
        return naive;
    }

    match (
        directory.to_utc(record.journey_departure, &record.origin),
        directory.to_utc(record.journey_arrival, &record.destination),
    ) {
        (Some(start), Some(end)) => (start.naive_utc(), end.naive_utc()),
        _ => naive,
    }
}

/// Multi-line event description: one line per segment with its times and
/// flight time, and the stopover between them.
fn event_details(record: &FlightRecord, directory: &AirportDirectory) -> String {
    let suffix = record.time_mode.suffix();
    let mut details = format!("Depart - {}\n\n", format_day(record.journey_departure));

    for (index, segment) in record.segments().enumerate() {
        if index == 1
            && let Some(stop) = &record.stopover
        {
            details.push_str(&format!(
                "\n- Stopover for {} in {} ({})\n\n",
                stop.layover,
                directory.name_or_code(&stop.airport),
                stop.airport
            ));
        }

        let flight_time = directory.segment_duration(
            segment.departure,
            segment.arrival,
            &segment.from,
            &segment.to,
            record.time_mode,
        );
        details.push_str(&format!(
            "{} {} ({}) | {} {} ({}) | Flight time {}\n",
            clock_time(segment.departure, suffix),
            directory.name_or_code(&segment.from),
            segment.from,
            clock_time(segment.arrival, suffix),
            directory.name_or_code(&segment.to),
            segment.to,
            flight_time
        ));
    }

    details.push_str(&format!("\nArrive - {}", format_day(record.journey_arrival)));
    details
}
