use crate::error::UnknownPattern;
use crate::pattern::{MONTH_NAMES, SHORT_MONTH_NAMES};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The shapes a date can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputPattern {
    /// `MM/DD/YYYY`
    #[default]
    Us,
    /// `DD/MM/YYYY`
    Eu,
    /// `YYYY-MM-DD`
    Iso,
    /// `MM/DD/YY`
    ShortUs,
    /// `DD/MM/YY`
    ShortEu,
    /// `DD-MMM-YYYY`
    DayMonthNameYear,
    /// `YYYY-MMM-DD`
    YearMonthNameDay,
    /// `DD MMMM YYYY`
    DayFullMonthNameYear,
    /// `YYYY年MM月DD日`
    EastAsian,
    /// `YYYY-MM-DD HH:MM:SS`
    IsoWithTime,
}

impl OutputPattern {
    pub const ALL: [OutputPattern; 10] = [
        OutputPattern::Us,
        OutputPattern::Eu,
        OutputPattern::Iso,
        OutputPattern::ShortUs,
        OutputPattern::ShortEu,
        OutputPattern::DayMonthNameYear,
        OutputPattern::YearMonthNameDay,
        OutputPattern::DayFullMonthNameYear,
        OutputPattern::EastAsian,
        OutputPattern::IsoWithTime,
    ];

    /// Stable identifier
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            OutputPattern::Us => "us",
            OutputPattern::Eu => "eu",
            OutputPattern::Iso => "iso",
            OutputPattern::ShortUs => "short-us",
            OutputPattern::ShortEu => "short-eu",
            OutputPattern::DayMonthNameYear => "day-month-name-year",
            OutputPattern::YearMonthNameDay => "year-month-name-day",
            OutputPattern::DayFullMonthNameYear => "day-full-month-name-year",
            OutputPattern::EastAsian => "east-asian",
            OutputPattern::IsoWithTime => "iso-with-time",
        }
    }

    /// User-facing layout token, as stored in settings
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            OutputPattern::Us => "MM/DD/YYYY",
            OutputPattern::Eu => "DD/MM/YYYY",
            OutputPattern::Iso => "YYYY-MM-DD",
            OutputPattern::ShortUs => "MM/DD/YY",
            OutputPattern::ShortEu => "DD/MM/YY",
            OutputPattern::DayMonthNameYear => "DD-MMM-YYYY",
            OutputPattern::YearMonthNameDay => "YYYY-MMM-DD",
            OutputPattern::DayFullMonthNameYear => "DD MMMM YYYY",
            OutputPattern::EastAsian => "YYYY年MM月DD日",
            OutputPattern::IsoWithTime => "YYYY-MM-DD HH:MM:SS",
        }
    }

    /// Spreadsheet number-format code for the same layout
    #[must_use]
    pub fn number_format(self) -> &'static str {
        match self {
            OutputPattern::Us => "mm/dd/yyyy",
            OutputPattern::Eu => "dd/mm/yyyy",
            OutputPattern::Iso => "yyyy-mm-dd",
            OutputPattern::ShortUs => "mm/dd/yy",
            OutputPattern::ShortEu => "dd/mm/yy",
            OutputPattern::DayMonthNameYear => "dd-mmm-yyyy",
            OutputPattern::YearMonthNameDay => "yyyy-mmm-dd",
            OutputPattern::DayFullMonthNameYear => "dd mmmm yyyy",
            OutputPattern::EastAsian => "yyyy\"年\"mm\"月\"dd\"日\"",
            OutputPattern::IsoWithTime => "yyyy-mm-dd hh:mm:ss",
        }
    }

    /// Whether the rendered text carries the time of day
    #[must_use]
    pub fn has_time(self) -> bool {
        matches!(self, OutputPattern::IsoWithTime)
    }

    /// Lenient lookup: unknown names fall back to the US layout.
    #[must_use]
    pub fn named(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for OutputPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for OutputPattern {
    type Err = UnknownPattern;

    /// Accepts the identifier (`iso`, `short-eu`, ...) or the layout token
    /// (`YYYY-MM-DD`, ...), ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OutputPattern::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(wanted) || p.token().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPattern(s.to_string()))
    }
}

impl TryFrom<String> for OutputPattern {
    type Error = UnknownPattern;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputPattern> for String {
    fn from(pattern: OutputPattern) -> Self {
        pattern.token().to_string()
    }
}

/// Render a date into `pattern`. `None` renders as an empty string.
///
/// ```
/// use cellscrub_dates::{format_as, OutputPattern};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// assert_eq!(format_as(date, OutputPattern::Iso), "2023-01-15");
/// assert_eq!(format_as(date, OutputPattern::named("DD-MMM-YYYY")), "15-Jan-2023");
/// assert_eq!(format_as(None, OutputPattern::Iso), "");
/// ```
pub fn format_as<D: Into<Option<NaiveDateTime>>>(date: D, pattern: OutputPattern) -> String {
    let Some(date) = date.into() else {
        return String::new();
    };

    let year = date.year();
    let month = date.month();
    let day = date.day();
    let short_year = year.rem_euclid(100);
    let month_index = date.month0() as usize;

    match pattern {
        OutputPattern::Us => format!("{month:02}/{day:02}/{year}"),
        OutputPattern::Eu => format!("{day:02}/{month:02}/{year}"),
        OutputPattern::Iso => format!("{year}-{month:02}-{day:02}"),
        OutputPattern::ShortUs => format!("{month:02}/{day:02}/{short_year:02}"),
        OutputPattern::ShortEu => format!("{day:02}/{month:02}/{short_year:02}"),
        OutputPattern::DayMonthNameYear => {
            format!("{day:02}-{}-{year}", SHORT_MONTH_NAMES[month_index])
        }
        OutputPattern::YearMonthNameDay => {
            format!("{year}-{}-{day:02}", SHORT_MONTH_NAMES[month_index])
        }
        OutputPattern::DayFullMonthNameYear => {
            format!("{day:02} {} {year}", MONTH_NAMES[month_index])
        }
        OutputPattern::EastAsian => format!("{year}年{month:02}月{day:02}日"),
        OutputPattern::IsoWithTime => format!(
            "{year}-{month:02}-{day:02} {:02}:{:02}:{:02}",
            date.hour(),
            date.minute(),
            date.second()
        ),
    }
}
