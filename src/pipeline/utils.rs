use chrono::{Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Excel serial for 9999-12-31, the last date a workbook can hold
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// String normalization helpers shared by the normalizer and the cleaner
pub struct StringUtils;

impl StringUtils {
    /// Key used to compare spreadsheet headers: trimmed, inner whitespace
    /// collapsed to one space, ASCII-lowercased
    pub fn header_key(header: &str) -> String {
        WHITESPACE_RUN
            .replace_all(header.trim(), " ")
            .to_ascii_lowercase()
    }

    /// True when `value` is one of `tokens` (exact, case-sensitive)
    pub fn is_token(value: &str, tokens: &[String]) -> bool {
        tokens.iter().any(|t| t == value)
    }

    /// Trim and drop values that are stringified missing markers
    pub fn clean_text(value: &str, null_tokens: &[String]) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || Self::is_token(trimmed, null_tokens) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Convert an Excel serial date (1900 date system) into a timestamp.
/// Serials before 1900-03-01 are shifted by a day to undo Excel's phantom
/// 1900-02-29.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let mut days = serial.trunc() as i64;
    if days < 60 {
        days += 1;
    }
    let millis = (serial.fract() * 86_400_000.0).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::milliseconds(millis))
}
