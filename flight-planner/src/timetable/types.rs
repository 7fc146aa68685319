//! Timetable API response DTOs.
//!
//! These types map directly to the timetable JSON API responses. Fields
//! this crate does not use are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// An entry of the active-airports list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportDto {
    /// IATA code.
    pub code: String,

    /// Human-readable airport name.
    pub name: String,

    /// IANA time zone identifier (e.g. "Europe/Dublin").
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// A bookable journey: one or more flights with an overall duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyDto {
    /// Total duration as "HH:MM".
    pub duration: String,

    /// Departure of the first flight.
    pub departure_date_time: String,

    /// Arrival of the last flight.
    pub arrival_date_time: String,

    /// Flights in travel order.
    #[serde(default)]
    pub flights: Vec<FlightDto>,
}

/// A single non-stop flight within a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDto {
    pub departure_date_time: String,
    pub arrival_date_time: String,
    pub departure_airport_code: String,
    pub arrival_airport_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_journey() {
        let json = r#"{
            "duration": "05:30",
            "departureDateTime": "2025-01-10T08:00:00",
            "arrivalDateTime": "2025-01-10T13:30:00",
            "flights": [
                {
                    "departureDateTime": "2025-01-10T08:00:00",
                    "arrivalDateTime": "2025-01-10T10:00:00",
                    "departureAirportCode": "DUB",
                    "arrivalAirportCode": "BGY",
                    "flightNumber": "FR1234"
                }
            ]
        }"#;

        let journey: JourneyDto = serde_json::from_str(json).unwrap();
        assert_eq!(journey.duration, "05:30");
        assert_eq!(journey.flights.len(), 1);
        assert_eq!(journey.flights[0].arrival_airport_code, "BGY");
    }

    #[test]
    fn deserialize_journey_without_flights() {
        let json = r#"{
            "duration": "01:00",
            "departureDateTime": "2025-01-10T08:00:00",
            "arrivalDateTime": "2025-01-10T09:00:00"
        }"#;

        let journey: JourneyDto = serde_json::from_str(json).unwrap();
        assert!(journey.flights.is_empty());
    }

    #[test]
    fn deserialize_airports() {
        let json = r#"[
            {"code": "DUB", "name": "Dublin", "timeZone": "Europe/Dublin", "country": {"code": "ie"}},
            {"code": "XXX", "name": "Nowhere"}
        ]"#;

        let airports: Vec<AirportDto> = serde_json::from_str(json).unwrap();
        assert_eq!(airports.len(), 2);
        assert_eq!(airports[0].time_zone.as_deref(), Some("Europe/Dublin"));
        assert_eq!(airports[1].time_zone, None);
    }
}
