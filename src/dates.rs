//! Date parsing and calendar helpers.
//!
//! Entity dates travel as ISO-8601 strings on the wire and stay strings on
//! the structs; everything that needs to compare instants parses on demand
//! through [`parse_when`]. Unparseable or absent dates simply yield `None`,
//! which downstream reads as "not overdue / not delayed / not upcoming".

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Lenient ISO-8601 parse to a UTC instant.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`, with offset), a zone-less
/// date-time (`2024-03-01T10:00:00`, read as UTC) and a bare date
/// (`2024-03-01`, read as UTC midnight). Anything else is `None`.
pub fn parse_when(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Parse an optional date string field.
pub fn parse_when_opt(s: Option<&str>) -> Option<DateTime<Utc>> {
    s.and_then(parse_when)
}

/// Whole calendar days from `now` until `when` (negative when past).
pub fn days_until(now: DateTime<Utc>, when: DateTime<Utc>) -> i64 {
    (when.date_naive() - now.date_naive()).num_days()
}

/// Year and month reached by stepping `back` months before (`year`, `month`).
pub fn shift_months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - back as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// Short English month label ("Jan" .. "Dec") for a 1-based month number.
pub fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

/// The last `count` calendar months ending at `now`, oldest first,
/// as 1-based month numbers.
pub fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<u32> {
    (0..count)
        .rev()
        .map(|back| shift_months_back(now.year(), now.month(), back).1)
        .collect()
}
