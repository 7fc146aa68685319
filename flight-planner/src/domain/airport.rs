//! Airport code and airport reference types.

use std::fmt;

use chrono_tz::Tz;

/// Error returned when parsing an invalid IATA airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport code: {reason}")]
pub struct InvalidAirportCode {
    reason: &'static str,
}

/// A valid 3-letter IATA airport code.
///
/// IATA codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `AirportCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use flight_planner::domain::AirportCode;
///
/// let dub = AirportCode::parse("DUB").unwrap();
/// assert_eq!(dub.as_str(), "DUB");
///
/// // Lowercase is rejected; use `parse_lenient` for API input
/// assert!(AirportCode::parse("dub").is_err());
/// assert_eq!(AirportCode::parse_lenient(" dub ").unwrap(), dub);
///
/// // Wrong length is rejected
/// assert!(AirportCode::parse("DU").is_err());
/// assert!(AirportCode::parse("DUBX").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirportCode([u8; 3]);

impl AirportCode {
    /// Parse an airport code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidAirportCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidAirportCode {
                reason: "must be exactly 3 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidAirportCode {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(AirportCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse an airport code after trimming and upper-casing the input.
    ///
    /// Used for codes coming from the timetable API and from the command line.
    pub fn parse_lenient(s: &str) -> Result<Self, InvalidAirportCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the airport code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirportCode({})", self.as_str())
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AirportCode {
    type Err = InvalidAirportCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s)
    }
}

/// An airport from the reference list.
///
/// `timezone` is `None` when the API reported a zone identifier that is
/// not a known IANA zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Airport {
    pub code: AirportCode,
    pub name: String,
    pub timezone: Option<Tz>,
}

impl Airport {
    /// Create a new airport.
    pub fn new(code: AirportCode, name: impl Into<String>, timezone: Option<Tz>) -> Self {
        Self {
            code,
            name: name.into(),
            timezone,
        }
    }
}
