//! Conversion from timetable DTOs to domain types.
//!
//! Journeys with one flight become direct records and journeys with two
//! flights become one-stop records. Anything else, and any journey whose
//! data cannot be trusted, is skipped with a warning rather than failing
//! the whole result set.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use tracing::warn;

use crate::domain::{
    Airport, AirportCode, ClockDuration, FlightRecord, Stopover, TimeMode, parse_instant,
    truncate_to_minute,
};

use super::types::{AirportDto, FlightDto, JourneyDto};

/// Why a journey could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Only direct and one-stop journeys are supported
    #[error("unsupported journey with {0} flights")]
    UnsupportedLegCount(usize),

    /// Failed to parse an instant
    #[error("invalid instant: {0}")]
    InvalidInstant(String),

    /// Failed to parse an airport code
    #[error("invalid airport code: {0}")]
    InvalidAirportCode(String),

    /// Failed to parse the total duration
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The second flight departs before the first arrives
    #[error("second flight departs {departure} from {stop}, before arrival at {arrival}")]
    NegativeLayover {
        stop: AirportCode,
        arrival: NaiveDateTime,
        departure: NaiveDateTime,
    },
}

/// Convert raw journeys into flight records.
///
/// Input order is preserved. Unsupported or malformed journeys are logged
/// and left out.
pub fn normalize(journeys: &[JourneyDto], time_mode: TimeMode) -> Vec<FlightRecord> {
    journeys
        .iter()
        .filter_map(|journey| match convert_journey(journey, time_mode) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    departure = %journey.departure_date_time,
                    flights = journey.flights.len(),
                    error = %e,
                    "Skipping journey"
                );
                None
            }
        })
        .collect()
}

/// Convert a single journey.
pub fn convert_journey(
    journey: &JourneyDto,
    time_mode: TimeMode,
) -> Result<FlightRecord, ConversionError> {
    let total_duration = ClockDuration::parse(&journey.duration)
        .map_err(|_| ConversionError::InvalidDuration(journey.duration.clone()))?;
    let journey_departure = instant(&journey.departure_date_time)?;
    let journey_arrival = instant(&journey.arrival_date_time)?;

    match journey.flights.as_slice() {
        [flight] => {
            let leg = Leg::convert(flight)?;
            Ok(FlightRecord {
                time_mode,
                origin: leg.from,
                departure: leg.departure,
                stopover: None,
                destination: leg.to,
                arrival: leg.arrival,
                total_duration,
                journey_departure,
                journey_arrival,
            })
        }
        [first, second] => {
            let first = Leg::convert(first)?;
            let second = Leg::convert(second)?;

            let layover = ClockDuration::between(first.arrival, second.departure).map_err(|_| {
                ConversionError::NegativeLayover {
                    stop: first.to,
                    arrival: first.arrival,
                    departure: second.departure,
                }
            })?;

            if first.to != second.from {
                warn!(
                    arrival = %first.to,
                    departure = %second.from,
                    "Connecting flights use different airports"
                );
            }

            Ok(FlightRecord {
                time_mode,
                origin: first.from,
                departure: first.departure,
                stopover: Some(Stopover {
                    airport: first.to,
                    arrival: first.arrival,
                    layover,
                    departure: second.departure,
                }),
                destination: second.to,
                arrival: second.arrival,
                total_duration,
                journey_departure,
                journey_arrival,
            })
        }
        flights => Err(ConversionError::UnsupportedLegCount(flights.len())),
    }
}

/// A parsed flight, minute-truncated.
struct Leg {
    from: AirportCode,
    departure: NaiveDateTime,
    to: AirportCode,
    arrival: NaiveDateTime,
}

impl Leg {
    fn convert(flight: &FlightDto) -> Result<Self, ConversionError> {
        Ok(Self {
            from: airport_code(&flight.departure_airport_code)?,
            departure: instant(&flight.departure_date_time)?,
            to: airport_code(&flight.arrival_airport_code)?,
            arrival: instant(&flight.arrival_date_time)?,
        })
    }
}

fn instant(s: &str) -> Result<NaiveDateTime, ConversionError> {
    parse_instant(s)
        .map(truncate_to_minute)
        .map_err(|_| ConversionError::InvalidInstant(s.to_string()))
}

fn airport_code(s: &str) -> Result<AirportCode, ConversionError> {
    AirportCode::parse_lenient(s).map_err(|_| ConversionError::InvalidAirportCode(s.to_string()))
}

/// Convert the airport list, skipping entries with invalid codes.
///
/// An unknown time zone keeps the airport but leaves its zone unset.
pub fn convert_airports(airports: Vec<AirportDto>) -> Vec<Airport> {
    airports
        .into_iter()
        .filter_map(|dto| {
            let code = match AirportCode::parse_lenient(&dto.code) {
                Ok(code) => code,
                Err(e) => {
                    warn!(code = %dto.code, error = %e, "Skipping airport");
                    return None;
                }
            };

            let timezone = dto.time_zone.as_deref().and_then(|zone| {
                let parsed = zone.parse::<Tz>().ok();
                if parsed.is_none() {
                    warn!(code = %code, zone, "Unknown time zone for airport");
                }
                parsed
            });

            Some(Airport::new(code, dto.name, timezone))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(dep: &str, arr: &str, from: &str, to: &str) -> FlightDto {
        FlightDto {
            departure_date_time: dep.to_string(),
            arrival_date_time: arr.to_string(),
            departure_airport_code: from.to_string(),
            arrival_airport_code: to.to_string(),
        }
    }

    fn journey(duration: &str, flights: Vec<FlightDto>) -> JourneyDto {
        JourneyDto {
            duration: duration.to_string(),
            departure_date_time: flights
                .first()
                .map(|f| f.departure_date_time.clone())
                .unwrap_or_else(|| "2025-01-10T08:00:00".to_string()),
            arrival_date_time: flights
                .last()
                .map(|f| f.arrival_date_time.clone())
                .unwrap_or_else(|| "2025-01-10T09:00:00".to_string()),
            flights,
        }
    }

    fn direct() -> JourneyDto {
        journey(
            "2:30",
            vec![flight("2025-01-10T08:00:00", "2025-01-10T10:30:00", "DUB", "ATH")],
        )
    }

    fn via_bgy() -> JourneyDto {
        journey(
            "05:30",
            vec![
                flight("2025-01-10T08:00:00", "2025-01-10T10:00:00", "DUB", "BGY"),
                flight("2025-01-10T12:00:00", "2025-01-10T13:30:00", "BGY", "ATH"),
            ],
        )
    }

    fn at(s: &str) -> NaiveDateTime {
        parse_instant(s).unwrap()
    }

    #[test]
    fn direct_journey() {
        let record = convert_journey(&direct(), TimeMode::Local).unwrap();
        assert_eq!(record.origin.as_str(), "DUB");
        assert_eq!(record.destination.as_str(), "ATH");
        assert_eq!(record.departure, at("2025-01-10 08:00"));
        assert_eq!(record.arrival, at("2025-01-10 10:30"));
        assert_eq!(record.total_duration.to_string(), "02:30");
        assert!(record.stopover.is_none());
        assert_eq!(record.time_mode, TimeMode::Local);
    }

    #[test]
    fn one_stop_journey() {
        let record = convert_journey(&via_bgy(), TimeMode::Utc).unwrap();
        let stop = record.stopover.as_ref().unwrap();
        assert_eq!(stop.airport.as_str(), "BGY");
        assert_eq!(stop.layover.to_string(), "02:00");
        assert_eq!(stop.arrival, at("2025-01-10 10:00"));
        assert_eq!(stop.departure, at("2025-01-10 12:00"));
        assert_eq!(record.destination.as_str(), "ATH");
        assert_eq!(record.arrival, at("2025-01-10 13:30"));
        assert_eq!(record.time_mode, TimeMode::Utc);
    }

    #[test]
    fn instants_truncated_to_minute() {
        let j = journey(
            "01:00",
            vec![flight("2025-01-10T08:00:59", "2025-01-10T09:00:30", "DUB", "STN")],
        );
        let record = convert_journey(&j, TimeMode::Local).unwrap();
        assert_eq!(record.departure, at("2025-01-10 08:00"));
        assert_eq!(record.journey_arrival, at("2025-01-10 09:00"));
    }

    #[test]
    fn unsupported_leg_counts() {
        let empty = journey("01:00", vec![]);
        assert_eq!(
            convert_journey(&empty, TimeMode::Local),
            Err(ConversionError::UnsupportedLegCount(0))
        );

        let three = journey(
            "09:00",
            vec![
                flight("2025-01-10T08:00:00", "2025-01-10T09:00:00", "DUB", "STN"),
                flight("2025-01-10T10:00:00", "2025-01-10T12:00:00", "STN", "BGY"),
                flight("2025-01-10T13:00:00", "2025-01-10T17:00:00", "BGY", "ATH"),
            ],
        );
        assert_eq!(
            convert_journey(&three, TimeMode::Local),
            Err(ConversionError::UnsupportedLegCount(3))
        );
    }

    #[test]
    fn negative_layover_rejected() {
        let j = journey(
            "03:00",
            vec![
                flight("2025-01-10T08:00:00", "2025-01-10T10:00:00", "DUB", "BGY"),
                flight("2025-01-10T09:30:00", "2025-01-10T11:00:00", "BGY", "ATH"),
            ],
        );
        assert!(matches!(
            convert_journey(&j, TimeMode::Local),
            Err(ConversionError::NegativeLayover { .. })
        ));
    }

    #[test]
    fn malformed_fields_rejected() {
        let mut j = direct();
        j.duration = "soon".to_string();
        assert!(matches!(
            convert_journey(&j, TimeMode::Local),
            Err(ConversionError::InvalidDuration(_))
        ));

        let mut j = direct();
        j.flights[0].departure_airport_code = "DUBLIN".to_string();
        assert!(matches!(
            convert_journey(&j, TimeMode::Local),
            Err(ConversionError::InvalidAirportCode(_))
        ));

        let mut j = direct();
        j.flights[0].arrival_date_time = "later".to_string();
        assert!(matches!(
            convert_journey(&j, TimeMode::Local),
            Err(ConversionError::InvalidInstant(_))
        ));
    }

    #[test]
    fn normalize_skips_and_preserves_order() {
        let journeys = vec![
            via_bgy(),
            journey("01:00", vec![]),
            direct(),
        ];
        let records = normalize(&journeys, TimeMode::Local);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stop().map(|c| c.to_string()), Some("BGY".to_string()));
        assert!(records[1].is_direct());
    }

    #[test]
    fn normalized_journeys_sort_by_departure() {
        let later_direct = journey(
            "2:30",
            vec![flight("2025-01-10T09:15:00", "2025-01-10T11:45:00", "DUB", "ATH")],
        );
        let records = normalize(&[later_direct, via_bgy()], TimeMode::Local);
        assert_eq!(records.len(), 2);
        assert!(records[0].is_direct());

        let sorted = crate::search::sort_flights(&records);
        let row = crate::present::FlightRow::from_record(&sorted[0]);
        assert_eq!(row.std, "2025-01-10 08:00");
        assert_eq!(row.stop, "BGY");
        assert_eq!(row.layover, "02:00");
        assert!(sorted[1].is_direct());
        assert_eq!(sorted[1].departure, at("2025-01-10 09:15"));
    }

    #[test]
    fn normalize_is_repeatable() {
        let journeys = vec![direct(), via_bgy()];
        assert_eq!(
            normalize(&journeys, TimeMode::Local),
            normalize(&journeys, TimeMode::Local)
        );
    }

    #[test]
    fn convert_airports_filters_invalid() {
        let airports = convert_airports(vec![
            AirportDto {
                code: "DUB".to_string(),
                name: "Dublin".to_string(),
                time_zone: Some("Europe/Dublin".to_string()),
            },
            AirportDto {
                code: "invalid".to_string(),
                name: "Bad Airport".to_string(),
                time_zone: None,
            },
            AirportDto {
                code: "bgy".to_string(),
                name: "Milan Bergamo".to_string(),
                time_zone: Some("Mars/Olympus".to_string()),
            },
        ]);

        assert_eq!(airports.len(), 2);
        assert_eq!(airports[0].timezone, Some(chrono_tz::Europe::Dublin));
        assert_eq!(airports[1].code.as_str(), "BGY");
        assert_eq!(airports[1].timezone, None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn minutes_to_instant(minutes: i64) -> String {
        let base = parse_instant("2025-01-10T00:00:00").unwrap();
        (base + chrono::Duration::minutes(minutes))
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }

    prop_compose! {
        fn flight_dto()(
            start in 0i64..5000,
            length in 30i64..600,
            from in "[A-Z]{3}",
            to in "[A-Z]{3}",
        ) -> FlightDto {
            FlightDto {
                departure_date_time: minutes_to_instant(start),
                arrival_date_time: minutes_to_instant(start + length),
                departure_airport_code: from,
                arrival_airport_code: to,
            }
        }
    }

    prop_compose! {
        fn journey_dto()(flights in prop::collection::vec(flight_dto(), 0..4)) -> JourneyDto {
            JourneyDto {
                duration: "01:00".to_string(),
                departure_date_time: minutes_to_instant(0),
                arrival_date_time: minutes_to_instant(60),
                flights,
            }
        }
    }

    proptest! {
        /// Never emits a record for 0 or 3+ flights, and the stop family is
        /// populated exactly for two-flight journeys
        #[test]
        fn record_shape_follows_leg_count(journey in journey_dto()) {
            match convert_journey(&journey, TimeMode::Local) {
                Ok(record) => {
                    let n = journey.flights.len();
                    prop_assert!(n == 1 || n == 2);
                    prop_assert_eq!(record.stopover.is_some(), n == 2);
                }
                Err(ConversionError::UnsupportedLegCount(n)) => {
                    prop_assert!(n == 0 || n >= 3);
                }
                Err(ConversionError::NegativeLayover { .. }) => {
                    prop_assert_eq!(journey.flights.len(), 2);
                }
                Err(e) => prop_assert!(false, "unexpected error {}", e),
            }
        }

        /// The layover equals the minute gap between the two flights
        #[test]
        fn layover_is_minute_gap(first in flight_dto(), gap in 0i64..1440, length in 30i64..600) {
            let arrival = parse_instant(&first.arrival_date_time).unwrap();
            let base = parse_instant("2025-01-10T00:00:00").unwrap();
            let departs = (arrival - base).num_minutes() + gap;
            let second = FlightDto {
                departure_date_time: minutes_to_instant(departs),
                arrival_date_time: minutes_to_instant(departs + length),
                departure_airport_code: first.arrival_airport_code.clone(),
                arrival_airport_code: "ATH".to_string(),
            };
            let journey = JourneyDto {
                duration: "10:00".to_string(),
                departure_date_time: first.departure_date_time.clone(),
                arrival_date_time: second.arrival_date_time.clone(),
                flights: vec![first, second],
            };

            let record = convert_journey(&journey, TimeMode::Utc).unwrap();
            let layover = record.stopover.unwrap().layover;
            prop_assert_eq!(i64::from(layover.minutes()), gap);
            prop_assert_eq!(layover.to_string(), format!("{:02}:{:02}", gap / 60, gap % 60));
        }

        /// Normalization drops exactly the unsupported journeys
        #[test]
        fn normalize_drops_unsupported(journeys in prop::collection::vec(journey_dto(), 0..8)) {
            let records = normalize(&journeys, TimeMode::Utc);
            let convertible = journeys
                .iter()
                .filter(|j| convert_journey(j, TimeMode::Utc).is_ok())
                .count();
            prop_assert_eq!(records.len(), convertible);
        }
    }
}
