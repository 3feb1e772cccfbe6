use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::pipeline::utils::excel_serial_to_datetime;
use crate::types::CellValue;

// Month-first forms come before their day-first twins so ambiguous dates read
// month-first; day-first only wins when month-first is impossible.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    "%b %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Order data starts well after this; earlier years mean a format misread
/// a short year or a day as the year.
const MIN_YEAR: i32 = 1900;

/// Numeric text below this (1954-10-03) is an id or a count, not a date serial
const MIN_TEXT_SERIAL: f64 = 20_000.0;

/// Best-effort date for an order date cell; anything unreadable is `None`
pub fn parse_order_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(serial) => excel_serial_to_datetime(*serial).map(|dt| dt.date()),
        CellValue::Text(text) => parse_date_text(text),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let plausible = |date: &NaiveDate| date.year() >= MIN_YEAR;

    if let Some(date) = DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
        .filter(plausible)
    {
        return Some(date);
    }
    let from_datetime = DATETIME_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(text, format)
            .ok()
            .map(|dt| dt.date())
            .filter(plausible)
    });
    if from_datetime.is_some() {
        return from_datetime;
    }
    let from_date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok().filter(plausible));
    if from_date.is_some() {
        return from_date;
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(date) = parse_compact_digits(text).filter(plausible) {
            return Some(date);
        }
    }

    // Serial numbers that were stored as text
    text.parse::<f64>()
        .ok()
        .filter(|serial| *serial >= MIN_TEXT_SERIAL)
        .and_then(excel_serial_to_datetime)
        .map(|dt| dt.date())
}

/// A bare year (`2024`) or a compact `YYYYMMDD` stamp
fn parse_compact_digits(digits: &str) -> Option<NaiveDate> {
    match digits.len() {
        4 => NaiveDate::from_ymd_opt(digits.parse().ok()?, 1, 1),
        8 => NaiveDate::from_ymd_opt(
            digits[..4].parse().ok()?,
            digits[4..6].parse().ok()?,
            digits[6..].parse().ok()?,
        ),
        _ => None,
    }
}
