//! The ordered table of textual date shapes.
//!
//! Rules are consulted top to bottom and the first rule whose regex matches
//! and whose extractor produces a real calendar date wins. The order is the
//! priority among shapes that share a digit layout.

use crate::error::UnknownPattern;
use crate::format::OutputPattern;
use chrono::{NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Identifies which rule (or non-text path) recognized a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternId {
    /// The cell already held a typed date.
    Native,
    /// A day-count number.
    Serial,
    Iso,
    Us,
    Eu,
    UsShortYear,
    EuShortYear,
    DayMonthNameYear,
    YearMonthNameDay,
    EastAsian,
    IsoWithTime,
    /// The free-form fallback parser.
    Auto,
}

impl PatternId {
    pub const ALL: [PatternId; 12] = [
        PatternId::Native,
        PatternId::Serial,
        PatternId::Iso,
        PatternId::Us,
        PatternId::Eu,
        PatternId::UsShortYear,
        PatternId::EuShortYear,
        PatternId::DayMonthNameYear,
        PatternId::YearMonthNameDay,
        PatternId::EastAsian,
        PatternId::IsoWithTime,
        PatternId::Auto,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PatternId::Native => "native",
            PatternId::Serial => "serial",
            PatternId::Iso => "iso",
            PatternId::Us => "us",
            PatternId::Eu => "eu",
            PatternId::UsShortYear => "us-short-year",
            PatternId::EuShortYear => "eu-short-year",
            PatternId::DayMonthNameYear => "day-month-name-year",
            PatternId::YearMonthNameDay => "year-month-name-day",
            PatternId::EastAsian => "east-asian",
            PatternId::IsoWithTime => "iso-with-time",
            PatternId::Auto => "auto",
        }
    }

    /// Human readable name shown in summaries
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            PatternId::Native => "Date Value",
            PatternId::Serial => "Serial Day Count",
            PatternId::Iso => "ISO 8601 (Year-Month-Day)",
            PatternId::Us => "US Format (Month/Day/Year)",
            PatternId::Eu => "European Format (Day/Month/Year)",
            PatternId::UsShortYear => "Short US Format (Month/Day/Year)",
            PatternId::EuShortYear => "Short European Format (Day/Month/Year)",
            PatternId::DayMonthNameYear => "Day-Month Name-Year",
            PatternId::YearMonthNameDay => "Year-Month Name-Day",
            PatternId::EastAsian => "East Asian Format (Year Month Day)",
            PatternId::IsoWithTime => "ISO 8601 with Time",
            PatternId::Auto => "Automatically Detected",
        }
    }

    /// The output shape that renders the same layout, if there is one.
    #[must_use]
    pub fn output_pattern(self) -> Option<OutputPattern> {
        match self {
            PatternId::Iso => Some(OutputPattern::Iso),
            PatternId::Us => Some(OutputPattern::Us),
            PatternId::Eu => Some(OutputPattern::Eu),
            PatternId::UsShortYear => Some(OutputPattern::ShortUs),
            PatternId::EuShortYear => Some(OutputPattern::ShortEu),
            PatternId::DayMonthNameYear => Some(OutputPattern::DayMonthNameYear),
            PatternId::YearMonthNameDay => Some(OutputPattern::YearMonthNameDay),
            PatternId::EastAsian => Some(OutputPattern::EastAsian),
            PatternId::IsoWithTime => Some(OutputPattern::IsoWithTime),
            PatternId::Native | PatternId::Serial | PatternId::Auto => None,
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternId {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PatternId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPattern(s.to_string()))
    }
}

pub(crate) const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub(crate) const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Resolve a month name to 1..=12: full names first, then abbreviations,
/// then the first three letters of a longer word ("Sept").
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    let position = |table: &[&str], wanted: &str| {
        table
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(wanted))
    };

    let index = position(&MONTH_NAMES, name)
        .or_else(|| position(&SHORT_MONTH_NAMES, name))
        .or_else(|| name.get(..3).and_then(|prefix| position(&SHORT_MONTH_NAMES, prefix)))?;
    u32::try_from(index + 1).ok()
}

/// Two-digit years below 50 belong to the 2000s, the rest to the 1900s.
pub(crate) fn expand_short_year(yy: i32) -> i32 {
    if yy < 50 {
        2000 + yy
    } else {
        1900 + yy
    }
}

type Extractor = fn(&Captures<'_>) -> Option<NaiveDateTime>;

/// One recognizable textual date shape.
pub struct PatternRule {
    pub id: PatternId,
    regex: Regex,
    extract: Extractor,
}

impl PatternRule {
    /// Whether the shape matches, regardless of calendar validity
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Match and extract; `None` if the shape differs or the date is not real
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<NaiveDateTime> {
        let caps = self.regex.captures(text)?;
        (self.extract)(&caps)
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    #[must_use]
    pub fn output_template(&self) -> Option<OutputPattern> {
        self.id.output_pattern()
    }
}

impl fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRule")
            .field("id", &self.id)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

fn num<T: FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn midnight(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

fn year_month_day(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    midnight(num(caps, 1)?, num(caps, 2)?, num(caps, 3)?)
}

fn month_day_year(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    midnight(num(caps, 3)?, num(caps, 1)?, num(caps, 2)?)
}

fn day_month_year(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    midnight(num(caps, 3)?, num(caps, 2)?, num(caps, 1)?)
}

fn month_day_short_year(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    midnight(expand_short_year(num(caps, 3)?), num(caps, 1)?, num(caps, 2)?)
}

fn day_month_short_year(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    midnight(expand_short_year(num(caps, 3)?), num(caps, 2)?, num(caps, 1)?)
}

fn day_month_name_year(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    midnight(num(caps, 3)?, month_from_name(caps.get(2)?.as_str())?, num(caps, 1)?)
}

fn year_month_name_day(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    midnight(num(caps, 1)?, month_from_name(caps.get(2)?.as_str())?, num(caps, 3)?)
}

fn iso_with_time(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let seconds = match caps.get(6) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    NaiveDate::from_ymd_opt(num(caps, 1)?, num(caps, 2)?, num(caps, 3)?)?.and_hms_opt(
        num(caps, 4)?,
        num(caps, 5)?,
        seconds,
    )
}

fn rule(id: PatternId, pattern: &str, extract: Extractor) -> Option<PatternRule> {
    Some(PatternRule {
        id,
        regex: Regex::new(pattern).ok()?,
        extract,
    })
}

/// The rule table, in priority order.
pub fn rules() -> &'static [PatternRule] {
    static RULES: OnceLock<Vec<PatternRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            rule(
                PatternId::Iso,
                r"^([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})$",
                year_month_day,
            ),
            rule(
                PatternId::Us,
                r"^([0-9]{1,2})[-/]([0-9]{1,2})[-/]([0-9]{4})$",
                month_day_year,
            ),
            rule(
                PatternId::Eu,
                r"^([0-9]{1,2})[-/.]([0-9]{1,2})[-/.]([0-9]{4})$",
                day_month_year,
            ),
            rule(
                PatternId::UsShortYear,
                r"^([0-9]{1,2})[-/]([0-9]{1,2})[-/]([0-9]{2})$",
                month_day_short_year,
            ),
            rule(
                PatternId::EuShortYear,
                r"^([0-9]{1,2})[-/.]([0-9]{1,2})[-/.]([0-9]{2})$",
                day_month_short_year,
            ),
            rule(
                PatternId::DayMonthNameYear,
                r"^([0-9]{1,2})[-/\s]([A-Za-z]{3,9})[-/\s]([0-9]{4})$",
                day_month_name_year,
            ),
            rule(
                PatternId::YearMonthNameDay,
                r"^([0-9]{4})[-/\s]([A-Za-z]{3,9})[-/\s]([0-9]{1,2})$",
                year_month_name_day,
            ),
            rule(
                PatternId::EastAsian,
                r"^([0-9]{4})[年\s]([0-9]{1,2})[月\s]([0-9]{1,2})日?$",
                year_month_day,
            ),
            rule(
                PatternId::IsoWithTime,
                r"^([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})[T\s]([0-9]{1,2}):([0-9]{1,2})(?::([0-9]{1,2}))?$",
                iso_with_time,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    })
}

/// Look up a single rule by id (text rules only)
#[must_use]
pub fn rule_for(id: PatternId) -> Option<&'static PatternRule> {
    rules().iter().find(|rule| rule.id == id)
}
