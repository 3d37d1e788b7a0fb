//! Status-bar clock: settings-driven date/time formatting and the
//! fixed one-second redisplay timer.

use chrono::{DateTime, Local, Locale};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

use crate::bus::{Bus, CalendarEvent};
use crate::settings::AppSettings;

/// Redisplay interval. The timer is rescheduled at this same fixed
/// interval on every settings change, whether or not seconds are shown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Render the status-bar text for `now` under the given settings.
///
/// Date part first, then time, joined with a space; either part can be
/// turned off. Returns an empty string when both are.
pub fn format_date_time(settings: &AppSettings, now: DateTime<Local>) -> String {
    let mut parts = Vec::new();
    if settings.show_date {
        parts.push(format_date(settings, now));
    }
    if settings.show_time {
        parts.push(format_time(settings, now));
    }
    parts.join(" ")
}

/// Render the date part using the user's pattern.
///
/// The pattern is only interpreted at render time; anything the
/// translator doesn't recognize passes through literally, so a bad
/// pattern renders oddly rather than erroring.
pub fn format_date(settings: &AppSettings, now: DateTime<Local>) -> String {
    let format = to_strftime(&settings.date_format);
    now.format_localized(&format, locale_for(&settings.holiday_country_code))
        .to_string()
}

/// Render the time part from the clock flags.
pub fn format_time(settings: &AppSettings, now: DateTime<Local>) -> String {
    let format = if settings.use_24_hour_clock {
        if settings.show_seconds {
            "%H:%M:%S"
        } else {
            "%H:%M"
        }
    } else if settings.show_ampm {
        if settings.show_seconds {
            "%p %-I:%M:%S"
        } else {
            "%p %-I:%M"
        }
    } else if settings.show_seconds {
        "%-I:%M:%S"
    } else {
        "%-I:%M"
    };
    now.format_localized(format, locale_for(&settings.holiday_country_code))
        .to_string()
}

fn locale_for(country_code: &str) -> Locale {
    if country_code == "KR" {
        Locale::ko_KR
    } else {
        Locale::en_US
    }
}

/// Translate a DateFormatter-style pattern (`M월 d일 (E)`) to strftime.
///
/// Letter runs map per the usual pattern alphabet (y, M, d, E, a, H, h,
/// m, s); single-quoted text and unknown letters are passed through as
/// literals.
fn to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\'' {
            // Quoted literal; '' is an escaped quote.
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            continue;
        }

        if ch.is_ascii_alphabetic() {
            let mut len = 1;
            while chars.get(i + len) == Some(&ch) {
                len += 1;
            }
            match map_run(ch, len) {
                Some(spec) => out.push_str(spec),
                None => {
                    for _ in 0..len {
                        push_literal(&mut out, ch);
                    }
                }
            }
            i += len;
            continue;
        }

        push_literal(&mut out, ch);
        i += 1;
    }

    out
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

fn map_run(ch: char, len: usize) -> Option<&'static str> {
    match (ch, len) {
        ('y', 2) => Some("%y"),
        ('y', _) => Some("%Y"),
        ('M', 1) => Some("%-m"),
        ('M', 2) => Some("%m"),
        ('M', 3) => Some("%b"),
        ('M', _) => Some("%B"),
        ('d', 1) => Some("%-d"),
        ('d', _) => Some("%d"),
        ('E', 4) => Some("%A"),
        ('E', _) => Some("%a"),
        ('a', _) => Some("%p"),
        ('H', 1) => Some("%-H"),
        ('H', _) => Some("%H"),
        ('h', 1) => Some("%-I"),
        ('h', _) => Some("%I"),
        ('m', 1) => Some("%-M"),
        ('m', _) => Some("%M"),
        ('s', 1) => Some("%-S"),
        ('s', _) => Some("%S"),
        _ => None,
    }
}

/// One-second redisplay timer publishing [`CalendarEvent::Tick`].
///
/// Must be started from within a tokio runtime. The first tick fires
/// immediately so the display never waits a second after startup.
pub struct Ticker {
    bus: Bus,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(bus: Bus) -> Self {
        let handle = Self::spawn(bus.clone());
        Self {
            bus,
            handle: Some(handle),
        }
    }

    /// Unconditionally reschedule on settings change. The interval stays
    /// [`TICK_INTERVAL`] either way.
    pub fn restart(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.handle = Some(Self::spawn(self.bus.clone()));
    }

    fn spawn(bus: Bus) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let _ = bus.publish(CalendarEvent::Tick);
            }
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("unambiguous local time")
    }

    fn settings() -> AppSettings {
        AppSettings {
            holiday_country_code: "US".to_string(),
            ..AppSettings::default()
        }
    }

    #[test]
    fn translates_the_default_korean_pattern() {
        assert_eq!(to_strftime("M월 d일 (E)"), "%-m월 %-d일 (%a)");
    }

    #[test]
    fn translates_common_patterns() {
        assert_eq!(to_strftime("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(to_strftime("EEEE, MMM d"), "%A, %b %-d");
        assert_eq!(to_strftime("yy/M/d"), "%y/%-m/%-d");
    }

    #[test]
    fn quoted_text_and_unknown_letters_pass_through() {
        assert_eq!(to_strftime("'week' E"), "week %a");
        assert_eq!(to_strftime("QQ d"), "QQ %-d");
        assert_eq!(to_strftime("d '%' d"), "%-d %% %-d");
    }

    #[test]
    fn formats_24_hour_time() {
        let mut settings = settings();
        let now = at(2025, 12, 15, 14, 5, 9);

        assert_eq!(format_time(&settings, now), "14:05");
        settings.show_seconds = true;
        assert_eq!(format_time(&settings, now), "14:05:09");
    }

    #[test]
    fn formats_12_hour_time_with_and_without_ampm() {
        let mut settings = settings();
        settings.use_24_hour_clock = false;
        let now = at(2025, 12, 15, 14, 5, 9);

        assert_eq!(format_time(&settings, now), "PM 2:05");
        settings.show_ampm = false;
        assert_eq!(format_time(&settings, now), "2:05");
        settings.show_seconds = true;
        assert_eq!(format_time(&settings, now), "2:05:09");
    }

    #[test]
    fn korean_default_pattern_renders_localized_weekday() {
        let mut settings = settings();
        settings.holiday_country_code = "KR".to_string();
        // 2025-12-15 is a Monday.
        let now = at(2025, 12, 15, 9, 0, 0);
        assert_eq!(format_date(&settings, now), "12월 15일 (월)");
    }

    #[test]
    fn date_and_time_parts_are_independently_omissible() {
        let mut settings = settings();
        settings.date_format = "yyyy-MM-dd".to_string();
        let now = at(2025, 12, 15, 14, 5, 0);

        assert_eq!(format_date_time(&settings, now), "2025-12-15 14:05");
        settings.show_date = false;
        assert_eq!(format_date_time(&settings, now), "14:05");
        settings.show_time = false;
        assert_eq!(format_date_time(&settings, now), "");
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_ticks_every_interval() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let _ticker = Ticker::start(bus.clone());

        assert_eq!(rx.recv().await.expect("first tick"), CalendarEvent::Tick);
        assert_eq!(rx.recv().await.expect("second tick"), CalendarEvent::Tick);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_keeps_ticking_at_the_same_interval() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let mut ticker = Ticker::start(bus.clone());

        assert_eq!(rx.recv().await.expect("tick"), CalendarEvent::Tick);
        ticker.restart();
        assert_eq!(rx.recv().await.expect("tick after restart"), CalendarEvent::Tick);
    }
}
