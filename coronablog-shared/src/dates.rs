/// Calendar dates labelling a forecast
///
/// A forecast of `n` days covers tomorrow through `today + n`; today itself
/// is never included.

use chrono::{Local, NaiveDate};

/// Display format for forecast dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `days` consecutive dates starting the day after `today`
pub fn upcoming_dates(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    today.iter_days().skip(1).take(days).collect()
}

/// [`upcoming_dates`] anchored on the local calendar date
pub fn upcoming_from_today(days: usize) -> Vec<NaiveDate> {
    upcoming_dates(Local::now().date_naive(), days)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
