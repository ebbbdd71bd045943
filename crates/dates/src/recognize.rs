use crate::pattern::{rules, PatternId};
use crate::serial::serial_to_datetime;
use cellscrub_sheet::CellValue;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Numbers outside this open interval are never treated as day counts.
const SERIAL_MIN: f64 = 1000.0;
const SERIAL_MAX: f64 = 50_000.0;

/// Layouts tried by the free-form fallback, date and time.
const FALLBACK_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%a %b %d %Y %H:%M:%S",
];

/// Layouts tried by the free-form fallback, date only.
const FALLBACK_DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%B %d %Y",
    "%A, %B %d, %Y",
    "%a %b %d %Y",
    "%d %B, %Y",
    "%Y.%m.%d",
];

/// A value recognized as a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognizedDate {
    pub date: NaiveDateTime,
    pub pattern: PatternId,
}

impl RecognizedDate {
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.pattern.display_name()
    }
}

/// Years 1901..=2099 are accepted on every parsing path.
fn plausible(date: NaiveDateTime) -> Option<NaiveDateTime> {
    (date.year() > 1900 && date.year() < 2100).then_some(date)
}

/// Classify a cell value as a date.
///
/// Returns `None` for anything that is not a date; this is an expected
/// outcome, not an error.
///
/// ```
/// use cellscrub_dates::{recognize, PatternId};
/// use cellscrub_sheet::CellValue;
///
/// let found = recognize(&CellValue::text("15-Jan-2023")).unwrap();
/// assert_eq!(found.pattern, PatternId::DayMonthNameYear);
/// assert!(recognize(&CellValue::text("13/40/2023")).is_none());
/// ```
#[must_use]
pub fn recognize(value: &CellValue) -> Option<RecognizedDate> {
    match value {
        CellValue::DateTime(date) => Some(RecognizedDate {
            date: *date,
            pattern: PatternId::Native,
        }),
        CellValue::Number(n) => recognize_serial(*n),
        CellValue::Text(s) => recognize_text(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Decode a day-count number in the open interval (1000, 50000)
#[must_use]
pub fn recognize_serial(serial: f64) -> Option<RecognizedDate> {
    if !(serial > SERIAL_MIN && serial < SERIAL_MAX) {
        return None;
    }
    let date = plausible(serial_to_datetime(serial)?)?;
    Some(RecognizedDate {
        date,
        pattern: PatternId::Serial,
    })
}

/// Recognize date text: the rule table first, then the free-form fallback
#[must_use]
pub fn recognize_text(text: &str) -> Option<RecognizedDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    rules()
        .iter()
        .find_map(|rule| {
            let date = plausible(rule.extract(trimmed)?)?;
            Some(RecognizedDate {
                date,
                pattern: rule.id,
            })
        })
        .or_else(|| {
            let date = plausible(parse_free_form(trimmed)?)?;
            Some(RecognizedDate {
                date,
                pattern: PatternId::Auto,
            })
        })
}

/// Last-resort parser for long-form and timestamp layouts.
fn parse_free_form(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_local());
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
