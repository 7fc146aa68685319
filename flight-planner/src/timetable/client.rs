//! Timetable HTTP client.
//!
//! Provides async methods for fetching the active-airport list and the
//! journeys between two airports over a date window. Handles rate
//! limiting and JSON decoding; conversion to domain types happens in the
//! search layer.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::{AirportCode, DATE_FORMAT, TimeMode};

use super::error::TimetableError;
use super::types::{AirportDto, JourneyDto};

/// Default base URL for the timetable API.
pub const DEFAULT_BASE_URL: &str = "https://services-api.ryanair.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Path of the active-airports list.
const AIRPORTS_PATH: &str = "/views/locate/5/airports/en/active";

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TimetableConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Query for journeys between one origin and one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyQuery {
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub time_mode: TimeMode,
    /// Minimum stopover in whole hours
    pub layover_from: u8,
    /// Maximum stopover in whole hours
    pub layover_to: u8,
}

impl JourneyQuery {
    /// Request path for this query.
    pub fn path(&self) -> String {
        format!("/timtbl/v3/journeys/{}/{}", self.origin, self.destination)
    }

    /// Query-string parameters for this query.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "departureDateFrom",
                self.date_from.format(DATE_FORMAT).to_string(),
            ),
            ("departureDateTo", self.date_to.format(DATE_FORMAT).to_string()),
            ("timeMode", self.time_mode.as_str().to_string()),
            ("layoverFrom", self.layover_from.to_string()),
            ("layoverTo", self.layover_to.to_string()),
        ]
    }
}

/// Timetable API client.
///
/// Uses a semaphore to limit concurrent requests, since one search fans
/// out into a request per origin/destination pair.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl TimetableClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TimetableConfig) -> Result<Self, TimetableError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch the list of active airports.
    pub async fn fetch_airports(&self) -> Result<Vec<AirportDto>, TimetableError> {
        self.get_json(AIRPORTS_PATH, &[]).await
    }

    /// Fetch journeys for one origin/destination pair.
    pub async fn fetch_journeys(
        &self,
        query: &JourneyQuery,
    ) -> Result<Vec<JourneyDto>, TimetableError> {
        self.get_json(&query.path(), &query.params()).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, TimetableError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TimetableError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);

        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TimetableError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TimetableError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TimetableError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
