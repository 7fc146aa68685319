//! Search configuration for flight searches.

use crate::domain::TimeMode;

/// Largest allowed stopover, in hours.
pub const MAX_LAYOVER_HOURS: u8 = 12;

/// Allowed stopover window in whole hours, `from <= to <= 12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoverBounds {
    from: u8,
    to: u8,
}

impl LayoverBounds {
    /// Create bounds, clamping both ends into `0..=12` and capping `from`
    /// at `to`.
    pub fn new(from: u8, to: u8) -> Self {
        let to = to.min(MAX_LAYOVER_HOURS);
        Self {
            from: from.min(to),
            to,
        }
    }

    /// Minimum stopover in hours.
    pub fn from(&self) -> u8 {
        self.from
    }

    /// Maximum stopover in hours.
    pub fn to(&self) -> u8 {
        self.to
    }

    /// Change the minimum; values above the maximum are capped at it.
    pub fn with_from(self, from: u8) -> Self {
        Self {
            from: from.min(MAX_LAYOVER_HOURS).min(self.to),
            to: self.to,
        }
    }

    /// Change the maximum; values below the minimum are floored at it.
    pub fn with_to(self, to: u8) -> Self {
        Self {
            from: self.from,
            to: to.min(MAX_LAYOVER_HOURS).max(self.from),
        }
    }
}

impl Default for LayoverBounds {
    fn default() -> Self {
        Self {
            from: 0,
            to: MAX_LAYOVER_HOURS,
        }
    }
}

/// Configuration parameters for a flight search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Allowed stopover window.
    pub layover: LayoverBounds,

    /// Whether results are in airport-local time or UTC.
    pub time_mode: TimeMode,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(layover: LayoverBounds, time_mode: TimeMode) -> Self {
        Self { layover, time_mode }
    }
}
