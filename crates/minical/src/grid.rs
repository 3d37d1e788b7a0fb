//! Calendar grid generation.
//!
//! The dropdown calendar renders a fixed 6x7 grid: leading days of the
//! previous month, every day of the displayed month, and trailing days of
//! the next month. The grid is always exactly [`GRID_CELLS`] entries so
//! the UI never reflows between five- and six-row layouts.

use chrono::{Datelike, Duration, Local, Months, NaiveDate};

use crate::holiday::Holiday;

/// Number of cells in the rendered grid (six full weeks).
pub const GRID_CELLS: usize = 42;

/// One rendered day slot, possibly outside the displayed month.
///
/// Cells are regenerated on every render; `holiday` is attached after
/// generation (see [`crate::holiday::service::HolidayService::annotate`]).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Whether the day belongs to the displayed month (vs. a filler day).
    pub is_current_month: bool,
    pub is_today: bool,
    pub holiday: Option<Holiday>,
}

impl CalendarDay {
    /// Day-of-month number (1-31).
    pub fn day_number(&self) -> u32 {
        self.date.day()
    }
}

/// First day of the date's month.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the date's month (leap-aware).
pub fn days_in_month(date: NaiveDate) -> u32 {
    let start = start_of_month(date);
    let next = start_of_month(next_month(start));
    next.signed_duration_since(start).num_days() as u32
}

/// Same day one month earlier, clamped to the shorter month if needed.
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(1)).unwrap_or(date)
}

/// Same day one month later, clamped to the shorter month if needed.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

/// Same day one year earlier.
pub fn previous_year(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12)).unwrap_or(date)
}

/// Same day one year later.
pub fn next_year(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12)).unwrap_or(date)
}

/// Generate the 42-cell grid for the month containing `anchor`.
///
/// Only the anchor's year/month matter; any date is a valid anchor. The
/// leading count depends on the weekday of the 1st under the selected
/// week-start convention (0 when the month opens the first column, up to
/// 6 when it opens the last). `is_today` is compared against the current
/// local date.
pub fn calendar_days(anchor: NaiveDate, week_starts_on_monday: bool) -> Vec<CalendarDay> {
    calendar_days_on(anchor, week_starts_on_monday, Local::now().date_naive())
}

fn calendar_days_on(anchor: NaiveDate, week_starts_on_monday: bool, today: NaiveDate) -> Vec<CalendarDay> {
    let start = start_of_month(anchor);
    let leading = if week_starts_on_monday {
        start.weekday().num_days_from_monday()
    } else {
        start.weekday().num_days_from_sunday()
    };
    let first_cell = start - Duration::days(i64::from(leading));

    (0..GRID_CELLS as i64)
        .map(|offset| {
            let date = first_cell + Duration::days(offset);
            CalendarDay {
                date,
                is_current_month: date.year() == start.year() && date.month() == start.month(),
                is_today: date == today,
                holiday: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn start_of_month_keeps_year_and_month() {
        let start = start_of_month(date(2025, 12, 15));
        assert_eq!(start, date(2025, 12, 1));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(date(2025, 12, 15)), 31);
        assert_eq!(days_in_month(date(2025, 2, 15)), 28);
        assert_eq!(days_in_month(date(2024, 2, 15)), 29);
        assert_eq!(days_in_month(date(2025, 4, 1)), 30);
    }

    #[test]
    fn month_navigation_rolls_over_year_boundaries() {
        let anchor = date(2025, 12, 15);
        assert_eq!(previous_month(anchor).month(), 11);
        let next = next_month(anchor);
        assert_eq!(next.month(), 1);
        assert_eq!(next.year(), 2026);

        let january = date(2026, 1, 15);
        let previous = previous_month(january);
        assert_eq!(previous.month(), 12);
        assert_eq!(previous.year(), 2025);
    }

    #[test]
    fn year_navigation() {
        assert_eq!(next_year(date(2025, 6, 1)), date(2026, 6, 1));
        assert_eq!(previous_year(date(2025, 6, 1)), date(2024, 6, 1));
    }

    #[test]
    fn grid_is_always_42_cells() {
        for (y, m) in [(2025, 2), (2024, 2), (2025, 6), (2025, 12), (2026, 1)] {
            let anchor = date(y, m, 15);
            assert_eq!(calendar_days(anchor, false).len(), GRID_CELLS);
            assert_eq!(calendar_days(anchor, true).len(), GRID_CELLS);
        }
    }

    #[test]
    fn current_month_cell_count_equals_days_in_month() {
        for (y, m) in [(2025, 2), (2024, 2), (2025, 4), (2025, 12)] {
            let anchor = date(y, m, 10);
            for monday in [false, true] {
                let current = calendar_days(anchor, monday)
                    .iter()
                    .filter(|day| day.is_current_month)
                    .count();
                assert_eq!(current as u32, days_in_month(anchor), "{y}-{m} monday={monday}");
            }
        }
    }

    // June 2025 starts on a Sunday: no leading filler under the
    // Sunday-first convention, a full six under Monday-first.
    #[test]
    fn leading_count_zero_starts_with_current_month() {
        let days = calendar_days_on(date(2025, 6, 15), false, date(2025, 6, 15));
        assert_eq!(days[0].date, date(2025, 6, 1));
        assert!(days[0].is_current_month);
        assert!(days[..7].iter().all(|day| day.is_current_month));
    }

    #[test]
    fn leading_count_six_fills_first_row_with_previous_month() {
        let days = calendar_days_on(date(2025, 6, 15), true, date(2025, 6, 15));
        assert_eq!(days[0].date, date(2025, 5, 26));
        assert!(days[..6].iter().all(|day| !day.is_current_month));
        assert_eq!(days[6].date, date(2025, 6, 1));
    }

    #[test]
    fn trailing_cells_come_from_the_next_month() {
        let days = calendar_days_on(date(2025, 6, 15), false, date(2025, 6, 15));
        // 0 leading + 30 days of June leaves 12 July cells.
        assert_eq!(days[30].date, date(2025, 7, 1));
        assert!(!days[30].is_current_month);
        assert_eq!(days[41].date, date(2025, 7, 12));
    }

    #[test]
    fn december_grid_spills_into_next_year() {
        let days = calendar_days_on(date(2025, 12, 15), false, date(2025, 12, 15));
        let last = days.last().expect("42 cells");
        assert_eq!(last.date.year(), 2026);
        assert_eq!(last.date.month(), 1);
    }

    #[test]
    fn is_today_marks_exactly_one_cell_for_an_in_month_today() {
        let today = date(2025, 6, 15);
        let days = calendar_days_on(today, false, today);
        let marked: Vec<_> = days.iter().filter(|day| day.is_today).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].date, today);
    }

    #[test]
    fn day_number_matches_date() {
        let day = CalendarDay {
            date: date(2025, 6, 15),
            is_current_month: true,
            is_today: false,
            holiday: None,
        };
        assert_eq!(day.day_number(), 15);
    }
}
