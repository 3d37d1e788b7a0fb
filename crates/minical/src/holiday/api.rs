//! Google Calendar API client for public holiday calendars.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{CalendarError, Result};
use crate::holiday::{calendar_id, language_code, Holiday};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Source of holiday data for one (country, year) unit.
///
/// [`HolidayService`](crate::holiday::service::HolidayService) only talks
/// to this trait, so tests can drive the pipeline with a stub.
#[async_trait]
pub trait HolidayFetcher: Send + Sync {
    async fn fetch_holidays(&self, country_code: &str, year: i32) -> Result<Vec<Holiday>>;
}

pub type SharedFetcher = Arc<dyn HolidayFetcher>;

/// Client configuration. The API key can be set explicitly or fall back
/// to `MINICAL_API_KEY` / `GOOGLE_CALENDAR_API_KEY` environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Get the effective API key, or a typed error when none is configured.
    pub fn effective_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        std::env::var("MINICAL_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_CALENDAR_API_KEY"))
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(CalendarError::MissingApiKey)
    }
}

/// Google Calendar v3 events client.
pub struct GoogleCalendarApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl GoogleCalendarApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl HolidayFetcher for GoogleCalendarApi {
    /// Fetch the holidays of one country for one full calendar year.
    ///
    /// Requests the UTC year window with `singleEvents`/`orderBy` flags and
    /// the country's display-language hint. Only all-day entries count as
    /// holidays; timed entries are silently skipped.
    async fn fetch_holidays(&self, country_code: &str, year: i32) -> Result<Vec<Holiday>> {
        let api_key = self.config.effective_api_key()?;
        let calendar = urlencoding::encode(calendar_id(country_code)).into_owned();
        let url = format!("{}/calendars/{}/events", self.config.base_url, calendar);
        let url = reqwest::Url::parse(&url)
            .map_err(|error| CalendarError::InvalidUrl(error.to_string()))?;

        let time_min = format!("{year}-01-01T00:00:00Z");
        let time_max = format!("{year}-12-31T23:59:59Z");

        let response = self
            .client
            .get(url)
            .query(&[
                ("key", api_key.as_str()),
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
                ("hl", language_code(country_code)),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let events: EventsResponse = serde_json::from_str(&body)?;
        Ok(events_to_holidays(events, country_code))
    }
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<EventItem>,
}

#[derive(Debug, Deserialize)]
struct EventItem {
    id: String,
    summary: String,
    start: EventStart,
}

#[derive(Debug, Deserialize)]
struct EventStart {
    /// All-day events carry `date`; timed events carry `dateTime` instead,
    /// which leaves this `None` and excludes the entry.
    date: Option<String>,
}

fn events_to_holidays(response: EventsResponse, country_code: &str) -> Vec<Holiday> {
    response
        .items
        .into_iter()
        .filter_map(|event| {
            let date = NaiveDate::parse_from_str(event.start.date.as_deref()?, "%Y-%m-%d").ok()?;
            Some(Holiday {
                id: event.id,
                date,
                name: event.summary,
                country_code: country_code.to_string(),
            })
        })
        .collect()
}
