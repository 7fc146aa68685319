//! Outbound links for flight records: booking pages and calendar events.

mod calendar;
mod deep_link;

pub use calendar::calendar_link;
pub use deep_link::flight_deep_link;

/// Error building a link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
