//! Prints the current month as the 6x7 grid the popover would render.
//!
//! Usage: `cargo run --bin month_grid`

use chrono::Local;
use minical::grid;
use minical::settings::AppSettings;

fn main() {
    let settings = AppSettings::default();
    let today = Local::now().date_naive();
    let days = grid::calendar_days(today, settings.week_starts_on_monday);

    println!("{}", today.format("%Y-%m"));
    let names = if settings.week_starts_on_monday {
        ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
    } else {
        ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
    };
    let header: Vec<String> = names.iter().map(|name| format!(" {name} ")).collect();
    println!("{}", header.join(""));

    for week in days.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|day| {
                if day.is_today {
                    format!("[{:>2}]", day.day_number())
                } else if day.is_current_month {
                    format!(" {:>2} ", day.day_number())
                } else {
                    "  · ".to_string()
                }
            })
            .collect();
        println!("{}", row.join(""));
    }
}
