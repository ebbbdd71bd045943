use crate::error::ReplaceError;
use cellscrub_sheet::CellValue;
use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Find/replace settings (`findReplace.*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindReplaceSettings {
    pub use_regex: bool,
    pub match_case: bool,
    pub whole_cell: bool,
    /// Most recent first
    pub recent_searches: Vec<String>,
}

impl FindReplaceSettings {
    #[must_use]
    pub fn options(&self) -> ReplaceOptions {
        ReplaceOptions {
            use_regex: self.use_regex,
            match_case: self.match_case,
            whole_cell: self.whole_cell,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    /// Treat the find text as a regular expression and expand `$1` style
    /// groups in the replacement
    pub use_regex: bool,
    pub match_case: bool,
    /// Only match when the find text covers the whole cell
    pub whole_cell: bool,
}

/// Outcome of replacing within one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    pub count: usize,
}

/// A compiled find/replace over text cells.
#[derive(Debug, Clone)]
pub struct Replacer {
    regex: Regex,
    replacement: String,
    expand_groups: bool,
}

impl Replacer {
    pub fn new(find: &str, replacement: &str, options: ReplaceOptions) -> Result<Self, ReplaceError> {
        if find.is_empty() {
            return Err(ReplaceError::EmptyFind);
        }

        let body = if options.use_regex {
            find.to_string()
        } else {
            regex::escape(find)
        };
        let pattern = if options.whole_cell {
            format!("^(?:{body})$")
        } else {
            body
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.match_case)
            .build()?;

        Ok(Self {
            regex,
            replacement: replacement.to_string(),
            expand_groups: options.use_regex,
        })
    }

    /// Replace every match; `None` if the text would not change
    #[must_use]
    pub fn replace_text(&self, text: &str) -> Option<Replacement> {
        let count = self.regex.find_iter(text).count();
        if count == 0 {
            return None;
        }
        let replaced = if self.expand_groups {
            self.regex.replace_all(text, self.replacement.as_str())
        } else {
            self.regex.replace_all(text, NoExpand(&self.replacement))
        };
        if replaced == text {
            return None;
        }
        Some(Replacement {
            text: replaced.into_owned(),
            count,
        })
    }

    /// Replace within a text cell; returns the number of replacements made
    pub fn apply(&self, cell: &mut CellValue) -> usize {
        let CellValue::Text(text) = cell else {
            return 0;
        };
        match self.replace_text(text) {
            Some(replacement) => {
                *text = replacement.text;
                replacement.count
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal() -> ReplaceOptions {
        ReplaceOptions::default()
    }

    #[test]
    fn test_literal_ignores_case_by_default() {
        let replacer = Replacer::new("cat", "dog", literal()).unwrap();
        let result = replacer.replace_text("Cat and cat.").unwrap();
        assert_eq!(result.text, "dog and dog.");
        assert_eq!(result.count, 2);
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        let replacer = Replacer::new("a.b", "$1", literal()).unwrap();
        assert!(replacer.replace_text("axb").is_none());
        assert_eq!(replacer.replace_text("a.b").unwrap().text, "$1");
    }

    #[test]
    fn test_match_case() {
        let options = ReplaceOptions {
            match_case: true,
            ..literal()
        };
        let replacer = Replacer::new("cat", "dog", options).unwrap();
        assert_eq!(replacer.replace_text("Cat cat").unwrap().text, "Cat dog");
    }

    #[test]
    fn test_whole_cell() {
        let options = ReplaceOptions {
            whole_cell: true,
            ..literal()
        };
        let replacer = Replacer::new("n/a", "", options).unwrap();
        assert!(replacer.replace_text("n/a please").is_none());
        assert_eq!(replacer.replace_text("N/A").unwrap().text, "");
    }

    #[test]
    fn test_regex_groups() {
        let options = ReplaceOptions {
            use_regex: true,
            ..literal()
        };
        let replacer = Replacer::new(r"(\w+)@example\.com", "$1@example.org", options).unwrap();
        let result = replacer.replace_text("ann@example.com, bob@example.com").unwrap();
        assert_eq!(result.text, "ann@example.org, bob@example.org");
        assert_eq!(result.count, 2);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Replacer::new("", "x", literal()),
            Err(ReplaceError::EmptyFind)
        ));
        let options = ReplaceOptions {
            use_regex: true,
            ..literal()
        };
        assert!(matches!(
            Replacer::new("(unclosed", "x", options),
            Err(ReplaceError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_apply_counts_and_skips_non_text() {
        let replacer = Replacer::new("a", "b", literal()).unwrap();
        let mut cell = CellValue::text("banana");
        assert_eq!(replacer.apply(&mut cell), 3);
        assert_eq!(cell, CellValue::text("bbnbnb"));

        let mut number = CellValue::Number(1.0);
        assert_eq!(replacer.apply(&mut number), 0);
    }

    #[test]
    fn test_identity_replacement_is_not_a_change() {
        let options = ReplaceOptions {
            match_case: true,
            ..literal()
        };
        let replacer = Replacer::new("x", "x", options).unwrap();
        assert!(replacer.replace_text("xx").is_none());
    }
}
