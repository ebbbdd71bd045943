use crate::error::CleanError;
use cellscrub_sheet::CellValue;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Acronyms kept as written when `respectAcronyms` is on.
pub const COMMON_ACRONYMS: [&str; 30] = [
    "NASA", "FBI", "CIA", "USA", "UK", "UN", "NATO", "CEO", "CFO", "CTO", "HR", "IT", "API", "URL",
    "HTTP", "HTTPS", "FTP", "HTML", "CSS", "XML", "JSON", "SQL", "PDF", "iOS", "ID", "PhD", "MBA",
    "BA", "BS", "MD",
];

/// Text shorter than this (and without sentence punctuation) is treated as a
/// title by [`CaseMode::Smart`].
const SMART_SENTENCE_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseMode {
    Upper,
    Lower,
    #[default]
    Proper,
    Sentence,
    /// Sentence case for sentences, proper case for short labels
    Smart,
}

impl CaseMode {
    pub const ALL: [CaseMode; 5] = [
        CaseMode::Upper,
        CaseMode::Lower,
        CaseMode::Proper,
        CaseMode::Sentence,
        CaseMode::Smart,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CaseMode::Upper => "UPPER",
            CaseMode::Lower => "LOWER",
            CaseMode::Proper => "PROPER",
            CaseMode::Sentence => "SENTENCE",
            CaseMode::Smart => "SMART",
        }
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseMode {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CleanError::UnknownCase(s.to_string()))
    }
}

/// Case conversion settings (`caseConversion.*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseSettings {
    pub default_case: CaseMode,
    pub respect_acronyms: bool,
    /// Words whose spelling survives proper and sentence case
    pub preserve_case: Vec<String>,
}

impl Default for CaseSettings {
    fn default() -> Self {
        Self {
            default_case: CaseMode::Proper,
            respect_acronyms: true,
            preserve_case: Vec::new(),
        }
    }
}

/// Converts text case, restoring preserved words afterwards.
#[derive(Debug, Clone, Default)]
pub struct CaseConverter {
    mode: CaseMode,
    /// lowercase word -> preserved spelling
    preserved: HashMap<String, String>,
}

impl CaseConverter {
    #[must_use]
    pub fn new(mode: CaseMode) -> Self {
        Self {
            mode,
            preserved: HashMap::new(),
        }
    }

    /// Build from settings; `mode` overrides `defaultCase` when given.
    #[must_use]
    pub fn from_settings(settings: &CaseSettings, mode: Option<CaseMode>) -> Self {
        let mut converter = Self::new(mode.unwrap_or(settings.default_case));
        if settings.respect_acronyms {
            converter = converter.with_acronyms();
        }
        converter.with_preserved_words(&settings.preserve_case)
    }

    #[must_use]
    pub fn with_acronyms(self) -> Self {
        self.with_preserved_words(COMMON_ACRONYMS)
    }

    #[must_use]
    pub fn with_preserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.preserved.insert(word.to_lowercase(), word.to_string());
            }
        }
        self
    }

    #[must_use]
    pub fn mode(&self) -> CaseMode {
        self.mode
    }

    #[must_use]
    pub fn convert(&self, text: &str) -> String {
        match self.mode {
            CaseMode::Upper => text.to_uppercase(),
            CaseMode::Lower => text.to_lowercase(),
            CaseMode::Proper => self.restore_preserved(proper_case(text)),
            CaseMode::Sentence => self.restore_preserved(sentence_case(text)),
            CaseMode::Smart => self.restore_preserved(smart_case(text)),
        }
    }

    /// Convert a text cell in place; returns whether it changed
    pub fn apply(&self, cell: &mut CellValue) -> bool {
        let CellValue::Text(text) = cell else {
            return false;
        };
        if text.is_empty() {
            return false;
        }
        let converted = self.convert(text);
        if converted == *text {
            return false;
        }
        *text = converted;
        true
    }

    fn restore_preserved(&self, text: String) -> String {
        let Some(words) = word_regex().filter(|_| !self.preserved.is_empty()) else {
            return text;
        };
        words
            .replace_all(&text, |caps: &Captures<'_>| {
                let word = &caps[0];
                self.preserved
                    .get(&word.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| word.to_string())
            })
            .into_owned()
    }
}

fn word_regex() -> Option<&'static Regex> {
    static RE: std::sync::OnceLock<Option<Regex>> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z]+\b").ok()).as_ref()
}

fn starts_word(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '(' | '[' | '{' | '"' | '\''),
    }
}

/// Lowercase everything, then capitalize the first character after the start,
/// whitespace, or an opening bracket or quote.
#[must_use]
pub fn proper_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        if !c.is_whitespace() && starts_word(prev) {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        prev = Some(c);
    }
    out
}

/// Lowercase everything, then capitalize the first letter of the text and the
/// first letter after each `.`, `?` or `!`.
#[must_use]
pub fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = true;
    for c in text.to_lowercase().chars() {
        if matches!(c, '.' | '?' | '!') {
            pending = true;
            out.push(c);
        } else if c.is_whitespace() {
            out.push(c);
        } else if pending && c.is_ascii_lowercase() {
            out.push(c.to_ascii_uppercase());
            pending = false;
        } else {
            out.push(c);
            pending = false;
        }
    }
    out
}

/// Sentence case for long or punctuated text, proper case otherwise.
#[must_use]
pub fn smart_case(text: &str) -> String {
    let looks_like_sentence = text.chars().count() > SMART_SENTENCE_LENGTH
        || text.contains(['.', '?', '!']);
    if looks_like_sentence {
        sentence_case(text)
    } else {
        proper_case(text)
    }
}
