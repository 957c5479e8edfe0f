//! Date helper functions

use chrono::{DateTime, Local, TimeZone, Utc};

/// Timestamp shown as "Published at", in the server's local time
///
/// # Examples
/// ```ignore
/// published_at(&date) // -> "1/5/2022, 10:30:00 AM"
/// ```
pub fn published_at(date: &DateTime<Utc>) -> String {
    locale_string(&date.with_timezone(&Local))
}

/// Month/day/year with a 12-hour clock
pub fn locale_string<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Short date for listings
pub fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}
