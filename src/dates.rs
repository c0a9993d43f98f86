use chrono::{Datelike, NaiveDate};

use crate::error::{OflightError, Result};

/// Two-digit years 69..=99 belong to the 1900s, 00..=68 to the 2000s.
/// chrono's `%y` pivots at 70 instead, so the century is resolved here.
fn expand_two_digit_year(digits: &str) -> Option<i32> {
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = digits.parse().ok()?;
    Some(if year >= 69 { 1900 + year } else { 2000 + year })
}

fn parse_month_year(month: &str, year: &str) -> Option<NaiveDate> {
    let year = expand_two_digit_year(year)?;
    NaiveDate::parse_from_str(&format!("01 {month} {year}"), "%d %b %Y").ok()
}

/// Parses `Mar-25` (first of the month) or `09 Mar 2023`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let parsed = match value.split_once('-') {
        Some((month, year)) if !year.contains('-') => parse_month_year(month, year),
        _ => NaiveDate::parse_from_str(value, "%d %b %Y").ok(),
    };

    parsed.ok_or_else(|| OflightError::DateParse {
        value: value.to_string(),
    })
}

/// Calendar month difference, ignoring the day of month. Negative for future dates.
pub fn months_between(then: NaiveDate, now: NaiveDate) -> i64 {
    let years = i64::from(now.year() - then.year());
    let months = i64::from(now.month()) - i64::from(then.month());
    years * 12 + months
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%b-%y").to_string()
}
