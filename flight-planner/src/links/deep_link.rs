//! Booking-page links for individual flight segments.

use crate::domain::{DATE_FORMAT, FlightRecord};

const BOOKING_URL: &str = "https://www.ryanair.com/ie/en/trip/flights/select";

/// Link to the booking page for one segment of a record.
///
/// Segment 0 runs from the origin to the stop (or the destination when
/// direct); segment 1 runs from the stop to the destination and exists only
/// for one-stop records.
///
/// # Examples
///
/// ```
/// use flight_planner::domain::{AirportCode, ClockDuration, FlightRecord, TimeMode, parse_instant};
/// use flight_planner::links::flight_deep_link;
///
/// let dep = parse_instant("2025-01-10 08:00").unwrap();
/// let arr = parse_instant("2025-01-10 14:00").unwrap();
/// let record = FlightRecord {
///     time_mode: TimeMode::Local,
///     origin: AirportCode::parse("DUB").unwrap(),
///     departure: dep,
///     stopover: None,
///     destination: AirportCode::parse("ATH").unwrap(),
///     arrival: arr,
///     total_duration: ClockDuration::from_minutes(240),
///     journey_departure: dep,
///     journey_arrival: arr,
/// };
///
/// let link = flight_deep_link(&record, 0).unwrap();
/// assert!(link.ends_with("dateOut=2025-01-10&dateIn=&isConnectedFlight=false&isReturn=false&discount=0&promoCode=&originIata=DUB&destinationIata=ATH"));
/// assert!(flight_deep_link(&record, 1).is_none());
/// ```
pub fn flight_deep_link(record: &FlightRecord, segment: usize) -> Option<String> {
    let segment = record.segment(segment)?;

    // Codes are three letters and dates ISO, so nothing needs escaping
    Some(format!(
        "{}?adults=1&teens=0&children=0&infants=0&dateOut={}&dateIn=\
         &isConnectedFlight=false&isReturn=false&discount=0&promoCode=\
         &originIata={}&destinationIata={}",
        BOOKING_URL,
        segment.departure.format(DATE_FORMAT),
        segment.from,
        segment.to,
    ))
}
