//! The search form and its persisted representation.

use tracing::warn;

use crate::domain::{
    AirportCode, DateRange, DateRangeState, TimeMode, TripType, format_date, parse_date,
};
use crate::search::{LayoverBounds, MAX_LAYOVER_HOURS, SearchConfig, SearchRequest};

use super::error::StoreError;
use super::file::KeyValueStore;

const ORIGINS: &str = "origins";
const DESTINATIONS: &str = "destinations";
const DEPARTURE_FROM: &str = "departure-from";
const DEPARTURE_TO: &str = "departure-to";
const RETURN_FROM: &str = "return-from";
const RETURN_TO: &str = "return-to";
const TRIP_TYPE: &str = "trip-type";
const LAYOVER_FROM: &str = "layover-from";
const LAYOVER_TO: &str = "layover-to";
const TIME_FORMAT: &str = "time-format";

/// Everything the user filled in for a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub origins: Vec<AirportCode>,
    pub destinations: Vec<AirportCode>,
    pub dates: DateRangeState,
    pub layover: LayoverBounds,
    pub time_mode: TimeMode,
}

impl FormState {
    /// Load the form from a store.
    ///
    /// Missing keys keep their defaults and unreadable values are logged
    /// and ignored. A saved start date also seeds the end date, which a
    /// saved end date then overrides. Saved return dates are never moved:
    /// a return range starting before the outbound range ends is cleared.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let value = |key: &str| store.get(key).filter(|v| !v.trim().is_empty());

        let origins = value(ORIGINS)
            .map(|v| parse_codes(ORIGINS, &v))
            .unwrap_or_default();
        let destinations = value(DESTINATIONS)
            .map(|v| parse_codes(DESTINATIONS, &v))
            .unwrap_or_default();

        let trip_type = match value(TRIP_TYPE).map(|v| v.parse::<TripType>()) {
            Some(Ok(trip_type)) => trip_type,
            Some(Err(e)) => {
                warn!(error = %e, "Ignoring saved trip type");
                TripType::default()
            }
            None => TripType::default(),
        };

        let date = |key: &str| {
            let raw = value(key)?;
            let parsed = parse_date(&raw);
            if parsed.is_none() {
                warn!(key, value = %raw, "Ignoring saved date");
            }
            parsed
        };

        let mut outbound = DateRange::default();
        if let Some(from) = date(DEPARTURE_FROM) {
            outbound = outbound.apply_from_change(Some(from));
        }
        if let Some(to) = date(DEPARTURE_TO) {
            outbound = outbound.apply_to_change(Some(to));
        }

        let mut inbound = DateRange::single(date(RETURN_FROM));
        if let Some(to) = date(RETURN_TO) {
            let next = inbound.apply_to_change(Some(to));
            inbound = DateRange::new(next.from.or(Some(to)), next.to);
        }

        let dates = DateRangeState::restore(trip_type, outbound, inbound);

        let layover = LayoverBounds::new(
            parse_hours(LAYOVER_FROM, value(LAYOVER_FROM)).unwrap_or(0),
            parse_hours(LAYOVER_TO, value(LAYOVER_TO)).unwrap_or(MAX_LAYOVER_HOURS),
        );

        let time_mode = match value(TIME_FORMAT).map(|v| v.parse::<TimeMode>()) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                warn!(error = %e, "Ignoring saved time mode");
                TimeMode::default()
            }
            None => TimeMode::default(),
        };

        Self {
            origins,
            destinations,
            dates,
            layover,
            time_mode,
        }
    }

    /// Write every field of the form to a store.
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        store.set(ORIGINS, codes_json(&self.origins)?);
        store.set(DESTINATIONS, codes_json(&self.destinations)?);
        store.set(DEPARTURE_FROM, format_date(self.dates.outbound.from));
        store.set(DEPARTURE_TO, format_date(self.dates.outbound.to));
        store.set(RETURN_FROM, format_date(self.dates.inbound.from));
        store.set(RETURN_TO, format_date(self.dates.inbound.to));
        store.set(TRIP_TYPE, self.dates.trip_type.as_str().to_string());
        store.set(LAYOVER_FROM, self.layover.from().to_string());
        store.set(LAYOVER_TO, self.layover.to().to_string());
        store.set(TIME_FORMAT, self.time_mode.as_str().to_string());
        Ok(())
    }

    /// Exchange origins and destinations.
    pub fn swap_airports(&mut self) {
        std::mem::swap(&mut self.origins, &mut self.destinations);
    }

    /// Search parameters from the form.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::new(self.layover, self.time_mode)
    }

    /// A search request for the current form.
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest::new(
            self.origins.clone(),
            self.destinations.clone(),
            self.dates,
            self.search_config(),
        )
    }
}

fn parse_codes(key: &str, raw: &str) -> Vec<AirportCode> {
    let codes: Vec<String> = match serde_json::from_str(raw) {
        Ok(codes) => codes,
        Err(e) => {
            warn!(key, error = %e, "Ignoring saved airport list");
            return Vec::new();
        }
    };

    codes
        .iter()
        .filter_map(|c| match AirportCode::parse_lenient(c) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!(key, code = %c, error = %e, "Ignoring saved airport code");
                None
            }
        })
        .collect()
}

fn parse_hours(key: &str, raw: Option<String>) -> Option<u8> {
    let raw = raw?;
    match raw.trim().parse::<u8>() {
        Ok(hours) => Some(hours),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring saved layover bound");
            None
        }
    }
}

fn codes_json(codes: &[AirportCode]) -> Result<String, StoreError> {
    let codes: Vec<&str> = codes.iter().map(AirportCode::as_str).collect();
    serde_json::to_string(&codes).map_err(|e| StoreError::Json {
        message: format!("failed to serialize airport list: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateEvent;
    use crate::store::JsonFileStore;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    fn store(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_store_gives_defaults() {
        let form = FormState::load(&HashMap::<String, String>::new());
        assert_eq!(form, FormState::default());
        assert_eq!(form.layover, LayoverBounds::default());
    }

    #[test]
    fn loads_all_fields() {
        let form = FormState::load(&store(&[
            ("origins", r#"["DUB","stn"]"#),
            ("destinations", r#"["ATH"]"#),
            ("departure-from", "2025-01-10"),
            ("departure-to", "2025-01-12"),
            ("return-from", "2025-01-14"),
            ("return-to", "2025-01-16"),
            ("trip-type", "return"),
            ("layover-from", "2"),
            ("layover-to", "5"),
            ("time-format", "UTC"),
        ]));

        assert_eq!(form.origins, vec![code("DUB"), code("STN")]);
        assert_eq!(form.destinations, vec![code("ATH")]);
        assert_eq!(
            form.dates.outbound,
            DateRange::new(parse_date("2025-01-10"), parse_date("2025-01-12"))
        );
        assert_eq!(
            form.dates.inbound,
            DateRange::new(parse_date("2025-01-14"), parse_date("2025-01-16"))
        );
        assert_eq!(form.dates.trip_type, TripType::Return);
        assert_eq!((form.layover.from(), form.layover.to()), (2, 5));
        assert_eq!(form.time_mode, TimeMode::Utc);
    }

    #[test]
    fn saved_from_seeds_to() {
        let form = FormState::load(&store(&[("departure-from", "2025-01-10")]));
        assert_eq!(form.dates.outbound.to, parse_date("2025-01-10"));
    }

    #[test]
    fn bad_values_are_ignored() {
        let form = FormState::load(&store(&[
            ("origins", "DUB"),
            ("destinations", r#"["ATH","nope"]"#),
            ("departure-from", "10/01/2025"),
            ("trip-type", "circular"),
            ("layover-from", "-1"),
            ("time-format", "GMT"),
        ]));

        assert!(form.origins.is_empty());
        assert_eq!(form.destinations, vec![code("ATH")]);
        assert!(form.dates.outbound.is_empty());
        assert_eq!(form.dates.trip_type, TripType::OneWay);
        assert_eq!(form.layover.from(), 0);
        assert_eq!(form.time_mode, TimeMode::Local);
    }

    #[test]
    fn saved_return_before_floor_is_cleared() {
        let form = FormState::load(&store(&[
            ("trip-type", "return"),
            ("departure-from", "2025-01-10"),
            ("departure-to", "2025-01-20"),
            ("return-from", "2025-01-14"),
            ("return-to", "2025-01-16"),
        ]));
        assert!(form.dates.inbound.is_empty());
        assert!(!form.dates.return_dates_valid());
        assert!(form.search_request().validate().is_err());
    }

    #[test]
    fn saved_return_from_seeds_return_to() {
        let form = FormState::load(&store(&[
            ("trip-type", "return"),
            ("departure-from", "2025-01-10"),
            ("return-from", "2025-01-14"),
        ]));
        assert_eq!(
            form.dates.inbound,
            DateRange::new(parse_date("2025-01-14"), parse_date("2025-01-14"))
        );
    }

    #[test]
    fn save_then_load() {
        let mut form = FormState::default();
        form.origins = vec![code("DUB")];
        form.destinations = vec![code("ATH"), code("BGY")];
        form.dates = form
            .dates
            .apply(DateEvent::TripType(TripType::Return))
            .apply(DateEvent::OutboundFrom(parse_date("2025-01-10")))
            .apply(DateEvent::ReturnFrom(parse_date("2025-01-13")));
        form.layover = LayoverBounds::new(1, 3);
        form.time_mode = TimeMode::Utc;

        let mut saved: HashMap<String, String> = HashMap::new();
        form.save(&mut saved).unwrap();

        assert_eq!(saved["origins"], r#"["DUB"]"#);
        assert_eq!(saved["trip-type"], "return");
        assert_eq!(saved["time-format"], "UTC");
        assert_eq!(FormState::load(&saved), form);
    }

    #[test]
    fn empty_dates_save_as_empty_strings() {
        let mut saved: HashMap<String, String> = HashMap::new();
        FormState::default().save(&mut saved).unwrap();
        assert_eq!(saved["departure-from"], "");
        assert_eq!(saved["origins"], "[]");
        assert_eq!(FormState::load(&saved), FormState::default());
    }

    #[test]
    fn swap_airports() {
        let mut form = FormState {
            origins: vec![code("DUB"), code("STN")],
            destinations: vec![code("ATH")],
            ..FormState::default()
        };
        form.swap_airports();
        assert_eq!(form.origins, vec![code("ATH")]);
        assert_eq!(form.destinations, vec![code("DUB"), code("STN")]);
    }

    #[test]
    fn search_request_from_form() {
        let form = FormState {
            origins: vec![code("DUB")],
            destinations: vec![code("ATH")],
            layover: LayoverBounds::new(2, 4),
            time_mode: TimeMode::Utc,
            ..FormState::default()
        };
        let request = form.search_request();
        assert_eq!(request.origins, form.origins);
        assert_eq!(request.config.layover.to(), 4);
        assert_eq!(request.config.time_mode, TimeMode::Utc);
    }

    #[test]
    fn persists_through_file_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("form.json");
        let form = FormState {
            origins: vec![code("DUB")],
            destinations: vec![code("ATH")],
            ..FormState::default()
        };

        let mut file = JsonFileStore::open(&path).unwrap();
        form.save(&mut file).unwrap();
        file.save().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(FormState::load(&reopened), form);
    }
}
