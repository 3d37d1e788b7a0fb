//! Engine for a menu-bar calendar utility: calendar-grid generation,
//! settings persistence, date/time formatting, and a holiday overlay
//! fetched from Google Calendar and cached on disk.
//!
//! The UI layer (status item, popover, settings windows) is expected to
//! own these services at its composition root, drive them from a single
//! task, and redraw on [`CalendarEvent`]s received from the [`Bus`].

pub mod bus;
pub mod clock;
pub mod error;
pub mod grid;
pub mod holiday;
pub mod settings;

pub use crate::bus::{Bus, CalendarEvent};
pub use crate::clock::Ticker;
pub use crate::error::{CalendarError, Result};
pub use crate::grid::{calendar_days, CalendarDay};
pub use crate::holiday::api::{ApiConfig, GoogleCalendarApi, HolidayFetcher, SharedFetcher};
pub use crate::holiday::cache::HolidayCache;
pub use crate::holiday::service::HolidayService;
pub use crate::holiday::Holiday;
pub use crate::settings::{AppSettings, SettingsStore};
