//! Holiday pipeline: cache-first loading, refresh, and day lookups.


use chrono::{Datelike, Local, NaiveDate};
use std::collections::{HashMap, HashSet};

use crate::bus::{Bus, CalendarEvent};
use crate::error::Result;
use crate::grid::CalendarDay;
use crate::holiday::api::SharedFetcher;
use crate::holiday::cache::HolidayCache;
use crate::holiday::{day_key, holiday_key, Holiday};

/// Stateful owner of the in-memory holiday index.
///
/// Mutating methods take `&mut self`; the composition root is expected to
/// own the service on a single task, which serializes all state changes
/// the way the original main-thread model did. Failures are recorded in
/// `last_error` and announced on the bus, never propagated as fatal.
pub struct HolidayService {
    fetcher: SharedFetcher,
    cache: HolidayCache,
    bus: Bus,
    /// Day key (`yyyy-MM-dd`) to the single holiday on that day.
    /// Merges are last-write-wins with no conflict detection.
    holidays: HashMap<String, Holiday>,
    /// `{country}_{year}` keys already merged this session.
    loaded_keys: HashSet<String>,
    is_loading: bool,
    last_error: Option<String>,
}

impl HolidayService {
    pub fn new(fetcher: SharedFetcher, cache: HolidayCache, bus: Bus) -> Self {
        Self {
            fetcher,
            cache,
            bus,
            holidays: HashMap::new(),
            loaded_keys: HashSet::new(),
            is_loading: false,
            last_error: None,
        }
    }

    /// Load one (country, year) unit, preferring the disk cache.
    ///
    /// Idempotent per key: once a key is marked loaded, later calls are
    /// no-ops until a refresh clears it. A failed attempt leaves the key
    /// unmarked so the next call retries. The check-then-fetch is not
    /// atomic; `&mut self` ownership is what prevents overlapping calls.
    pub async fn ensure_loaded(&mut self, country_code: &str, year: i32) {
        let key = holiday_key(country_code, year);
        if self.loaded_keys.contains(&key) {
            return;
        }

        self.begin();
        match self.load_unit(country_code, year, &key).await {
            Ok(()) => self.finish_ok(),
            Err(error) => self.finish_err("holiday load failed", &error),
        }
    }

    /// Drop the cached unit and re-fetch it from the network.
    ///
    /// Purges every in-memory holiday of the country, including other
    /// years, which stay unloaded until separately requested. Intentional
    /// simplification carried over from the original.
    pub async fn refresh(&mut self, country_code: &str, year: i32) {
        let key = holiday_key(country_code, year);

        self.begin();
        let result = async {
            self.cache.delete(country_code, year).await?;
            self.remove_country(country_code);
            self.loaded_keys.remove(&key);

            self.fetch_and_store(country_code, year, &key).await
        }
        .await;

        match result {
            Ok(()) => self.finish_ok(),
            Err(error) => self.finish_err("holiday refresh failed", &error),
        }
    }

    /// Drop every cached unit of the country, then fetch only the current
    /// calendar year. Other years stay unloaded until requested again.
    pub async fn refresh_all(&mut self, country_code: &str) {
        self.begin();
        let result = async {
            self.cache.delete_all(country_code).await?;
            self.remove_country(country_code);
            let prefix = format!("{country_code}_");
            self.loaded_keys.retain(|key| !key.starts_with(&prefix));

            let year = current_year();
            let key = holiday_key(country_code, year);
            self.fetch_and_store(country_code, year, &key).await
        }
        .await;

        match result {
            Ok(()) => self.finish_ok(),
            Err(error) => self.finish_err("holiday full refresh failed", &error),
        }
    }

    /// Hard reset for a country switch: the whole index and loaded set are
    /// cleared before the new country's current year is loaded.
    pub async fn change_country(&mut self, country_code: &str) {
        self.holidays.clear();
        self.loaded_keys.clear();
        self.ensure_loaded(country_code, current_year()).await;
    }

    /// O(1) lookup against the in-memory index. Never touches I/O.
    pub fn holiday_for(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.get(&day_key(date))
    }

    /// Attach holidays to freshly generated grid cells.
    pub fn annotate(&self, days: &mut [CalendarDay]) {
        for day in days {
            day.holiday = self.holiday_for(day.date).cloned();
        }
    }

    pub async fn has_cached_data(&self, country_code: &str, year: i32) -> bool {
        self.cache.exists(country_code, year).await
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Sticky rendering of the most recent failure, cleared when the next
    /// operation starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    async fn load_unit(&mut self, country_code: &str, year: i32, key: &str) -> Result<()> {
        if let Some(cached) = self.cache.load(country_code, year).await? {
            self.merge(cached);
            self.loaded_keys.insert(key.to_string());
            return Ok(());
        }
        self.fetch_and_store(country_code, year, key).await
    }

    async fn fetch_and_store(&mut self, country_code: &str, year: i32, key: &str) -> Result<()> {
        let fetched = self.fetcher.fetch_holidays(country_code, year).await?;
        self.cache.save(&fetched, country_code, year).await?;
        self.merge(fetched);
        self.loaded_keys.insert(key.to_string());
        Ok(())
    }

    fn merge(&mut self, holidays: Vec<Holiday>) {
        for holiday in holidays {
            self.holidays.insert(day_key(holiday.date), holiday);
        }
    }

    fn remove_country(&mut self, country_code: &str) {
        self.holidays
            .retain(|_, holiday| holiday.country_code != country_code);
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.last_error = None;
    }

    fn finish_ok(&mut self) {
        self.is_loading = false;
        let _ = self.bus.publish(CalendarEvent::HolidaysUpdated);
    }

    fn finish_err(&mut self, context: &str, error: &crate::error::CalendarError) {
        tracing::warn!("{context}: {error}");
        let message = format!("{context}: {error}");
        self.last_error = Some(message.clone());
        self.is_loading = false;
        let _ = self.bus.publish(CalendarEvent::HolidayError { message });
    }
}

fn current_year() -> i32 {
    Local::now().year()
}
