//! # cellscrub-dates
//!
//! Date recognition for spreadsheet cells.
//!
//! This crate provides:
//! - `recognize`: classify a cell value as a date and name the shape it was
//!   written in (typed date, serial day count, or one of the textual rules)
//! - `format_as`: render a date into one of the supported output layouts
//! - `dominant_pattern` / `PatternTally`: pick the most common shape in a grid
//!
//! Recognition is pure and never fails; "not a date" is reported as `None`.

/// Most frequent shape in a grid.
pub mod dominant;
/// Error types.
pub mod error;
/// Output layouts and rendering.
pub mod format;
/// The ordered rule table.
pub mod pattern;
/// Cell classification.
pub mod recognize;
/// Serial day-count conversion.
pub mod serial;

pub use dominant::{dominant_pattern, PatternTally, DEFAULT_PATTERN};
pub use error::UnknownPattern;
pub use format::{format_as, OutputPattern};
pub use pattern::{rules, PatternId, PatternRule};
pub use recognize::{recognize, recognize_serial, recognize_text, RecognizedDate};
pub use serial::{datetime_to_serial, serial_to_datetime};
