//! Persisted app settings.
//!
//! One JSON record on disk; missing or undecodable data leaves the
//! defaults in place (logged, not surfaced). Saves announce
//! [`CalendarEvent::SettingsChanged`] so the presentation layer can
//! redraw and restart its timer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bus::{Bus, CalendarEvent};
use crate::error::{CalendarError, Result};
use crate::holiday;

/// User-configurable settings, serialized with the historical camelCase
/// field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub open_at_login: bool,
    pub show_only_icon: bool,
    pub show_time: bool,
    pub show_seconds: bool,
    pub use_24_hour_clock: bool,
    /// Only meaningful with the 12-hour clock.
    #[serde(rename = "showAMPM")]
    pub show_ampm: bool,
    pub show_date: bool,
    /// DateFormatter-style pattern (`E` weekday, `M` month, `d` day, ...).
    /// Validated only at render time.
    pub date_format: String,
    /// Sunday-first when false.
    pub week_starts_on_monday: bool,
    pub show_holidays: bool,
    pub holiday_country_code: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            open_at_login: false,
            show_only_icon: false,
            show_time: true,
            show_seconds: false,
            use_24_hour_clock: true,
            show_ampm: true,
            show_date: true,
            date_format: "M월 d일 (E)".to_string(),
            week_starts_on_monday: false,
            show_holidays: true,
            holiday_country_code: default_country_code(),
        }
    }
}

/// System region when it is one of the supported countries, else KR.
fn default_country_code() -> String {
    std::env::var("LANG")
        .ok()
        .and_then(|lang| region_from_lang(&lang))
        .filter(|code| holiday::is_supported(code))
        .unwrap_or_else(|| "KR".to_string())
}

/// Territory part of a locale string like `en_US.UTF-8`.
fn region_from_lang(lang: &str) -> Option<String> {
    lang.split('.').next()?.split('_').nth(1).map(str::to_string)
}

/// File-backed settings store.
pub struct SettingsStore {
    path: PathBuf,
    bus: Bus,
    settings: AppSettings,
}

impl SettingsStore {
    /// Open the store, reading any persisted record. Load failures keep
    /// the defaults.
    pub fn open(path: PathBuf, bus: Bus) -> Self {
        let settings = Self::load(&path).unwrap_or_default();
        Self { path, bus, settings }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("minical")
            .join("settings.json")
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Apply a mutation, persist it, and announce the change.
    pub fn update(&mut self, apply: impl FnOnce(&mut AppSettings)) -> Result<()> {
        apply(&mut self.settings);
        self.save()?;
        let _ = self.bus.publish(CalendarEvent::SettingsChanged);
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CalendarError::io("failed to create settings directory", parent, error)
            })?;
        }
        let data = serde_json::to_vec_pretty(&self.settings)?;
        std::fs::write(&self.path, data)
            .map_err(|error| CalendarError::io("failed to write settings file", &self.path, error))
    }

    fn load(path: &Path) -> Option<AppSettings> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return None,
            Err(error) => {
                tracing::warn!("failed to read settings file {}: {error}", path.display());
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(settings) => Some(settings),
            Err(error) => {
                tracing::warn!("failed to decode settings file {}: {error}", path.display());
                None
            }
        }
    }
}
