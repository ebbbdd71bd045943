use cellscrub_sheet::CellValue;
use serde::{Deserialize, Serialize};

/// Which whitespace clean-ups to apply to text cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrimOptions {
    pub trim_left: bool,
    pub trim_right: bool,
    /// Collapse every whitespace run to a single space
    pub reduce_duplicate_spaces: bool,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            trim_left: true,
            trim_right: true,
            reduce_duplicate_spaces: true,
        }
    }
}

impl TrimOptions {
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut s = text;
        if self.trim_left {
            s = s.trim_start();
        }
        if self.trim_right {
            s = s.trim_end();
        }
        if self.reduce_duplicate_spaces {
            collapse_whitespace(s)
        } else {
            s.to_string()
        }
    }

    /// Clean a text cell in place; returns whether it changed
    pub fn clean_cell(&self, cell: &mut CellValue) -> bool {
        let CellValue::Text(text) = cell else {
            return false;
        };
        let cleaned = self.apply(text);
        if cleaned == *text {
            return false;
        }
        *text = cleaned;
        true
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trims_and_collapses() {
        let options = TrimOptions::default();
        assert_eq!(options.apply("  Hello   big\t\tworld  "), "Hello big world");
        assert_eq!(options.apply("a\nb"), "a b");
    }

    #[test]
    fn test_individual_options() {
        let left_only = TrimOptions {
            trim_left: true,
            trim_right: false,
            reduce_duplicate_spaces: false,
        };
        assert_eq!(left_only.apply("  a  b  "), "a  b  ");

        let collapse_only = TrimOptions {
            trim_left: false,
            trim_right: false,
            reduce_duplicate_spaces: true,
        };
        assert_eq!(collapse_only.apply("  a  b  "), " a b ");
    }

    #[test]
    fn test_clean_cell_reports_changes() {
        let options = TrimOptions::default();
        let mut cell = CellValue::text(" x ");
        assert!(options.clean_cell(&mut cell));
        assert_eq!(cell, CellValue::text("x"));
        assert!(!options.clean_cell(&mut cell));

        let mut number = CellValue::Number(1.0);
        assert!(!options.clean_cell(&mut number));
    }
}
