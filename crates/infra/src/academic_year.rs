//! Japanese school-year (April to March) arithmetic.

use chrono::{Datelike, NaiveDate};

/// Academic year a date belongs to. April 1st is the boundary:
/// January 2025 is still the 2024 academic year.
pub fn academic_year_of(date: NaiveDate) -> i32 {
    if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Inclusive bounds of an academic year: April 1st through March 31st.
pub fn year_window(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 4, 1).expect("April 1st exists");
    let end = NaiveDate::from_ymd_opt(year + 1, 3, 31).expect("March 31st exists");
    (start, end)
}

/// The current academic year plus the five preceding ones, newest first.
pub fn available_years(today: NaiveDate) -> Vec<i32> {
    let current = academic_year_of(today);
    (0..6).map(|i| current - i).collect()
}

/// Display label, e.g. 2024 -> "2024年度".
pub fn format_academic_year(year: i32) -> String {
    format!("{year}年度")
}
