use cellscrub_dates::{format_as, recognize, OutputPattern, PatternId};
use cellscrub_sheet::CellValue;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Date standardization settings (`dateFormat.*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateFormatSettings {
    pub preferred_format: OutputPattern,
    /// Reuse the most common layout already in the range
    pub detect_existing: bool,
    pub preserve_time_components: bool,
}

impl Default for DateFormatSettings {
    fn default() -> Self {
        Self {
            preferred_format: OutputPattern::Us,
            detect_existing: true,
            preserve_time_components: true,
        }
    }
}

/// Rewrites recognized dates as text in one output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStandardizer {
    target: OutputPattern,
    preserve_time: bool,
}

impl DateStandardizer {
    #[must_use]
    pub fn new(target: OutputPattern, preserve_time: bool) -> Self {
        Self {
            target,
            preserve_time,
        }
    }

    /// Pick the target layout: the detected dominant pattern when detection
    /// is on and that pattern has a matching output layout, the preferred
    /// format otherwise.
    #[must_use]
    pub fn from_settings(settings: &DateFormatSettings, detected: Option<PatternId>) -> Self {
        let target = detected
            .filter(|_| settings.detect_existing)
            .and_then(PatternId::output_pattern)
            .unwrap_or(settings.preferred_format);
        Self::new(target, settings.preserve_time_components)
    }

    #[must_use]
    pub fn target(&self) -> OutputPattern {
        self.target
    }

    #[must_use]
    pub fn render(&self, date: NaiveDateTime) -> String {
        let mut text = format_as(date, self.target);
        let has_time = (date.hour(), date.minute(), date.second()) != (0, 0, 0);
        if self.preserve_time && has_time && !self.target.has_time() {
            text.push_str(&format!(
                " {:02}:{:02}:{:02}",
                date.hour(),
                date.minute(),
                date.second()
            ));
        }
        text
    }

    /// Rewrite a date cell; returns whether it changed
    pub fn apply(&self, cell: &mut CellValue) -> bool {
        let Some(found) = recognize(cell) else {
            return false;
        };
        let text = self.render(found.date);
        if cell.as_text() == Some(text.as_str()) {
            return false;
        }
        *cell = CellValue::Text(text);
        true
    }
}
