use chrono::NaiveDate;

use crate::errors::OpError;

/// Accepted input formats, tried in order. Two-digit-year forms sit before
/// their four-digit twins so chrono cannot read `"25"` as the year 0025,
/// and day-first numeric forms come before the month-first fallbacks.
const FORMATS: &[&str] = &[
    "%d-%m-%y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%Y %b %d",
];

/// Normalize any supported textual date into canonical `YYYY-MM-DD`.
///
/// When a numeric date reads both ways (`1-2-2025`), the day-first
/// interpretation wins; a month-first reading is only reached when no
/// day-first one is possible (`12-25-2025`). Unparseable input fails with
/// the original text attached, never a silent default.
pub fn normalize(text: &str) -> Result<String, OpError> {
    let cleaned = clean(text);
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }
    Err(OpError::InvalidDate(text.to_string()))
}

/// Unify separators so one format list covers `/`, `.` and `-` input, and
/// turn commas into whitespace for month-name forms like `"Dec 1, 2025"`.
fn clean(text: &str) -> String {
    let unified: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '.' => '-',
            ',' => ' ',
            c => c,
        })
        .collect();
    unified.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "dates_tests.rs"]
mod tests;
