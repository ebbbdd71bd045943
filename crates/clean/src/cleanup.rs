use crate::case::{CaseConverter, CaseMode};
use crate::error::CleanError;
use crate::numbers::fix_number;
use crate::settings::Settings;
use crate::trim::TrimOptions;
use cellscrub_sheet::{CellGrid, CellValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupOperation {
    Duplicates,
    Spaces,
    Case,
    Formatting,
}

impl CleanupOperation {
    pub const ALL: [CleanupOperation; 4] = [
        CleanupOperation::Duplicates,
        CleanupOperation::Spaces,
        CleanupOperation::Case,
        CleanupOperation::Formatting,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CleanupOperation::Duplicates => "duplicates",
            CleanupOperation::Spaces => "spaces",
            CleanupOperation::Case => "case",
            CleanupOperation::Formatting => "formatting",
        }
    }
}

impl fmt::Display for CleanupOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleanupOperation {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CleanupOperation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CleanError::UnknownOperation(s.to_string()))
    }
}

/// One-click cleanup settings (`oneClickCleanup.*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleanupSettings {
    pub enabled_operations: Vec<CleanupOperation>,
    pub auto_detect_operations: bool,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            enabled_operations: CleanupOperation::ALL.to_vec(),
            auto_detect_operations: true,
        }
    }
}

/// Per-step tallies of a one-click cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub trimmed_cells: usize,
    pub case_fixed_cells: usize,
    pub number_fixed_cells: usize,
    pub duplicates_removed: usize,
}

impl CleanupReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// User-facing summary of what changed
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No changes were needed in the selected range.".to_string();
        }
        let mut lines = vec!["One-click cleanup results:".to_string()];
        if self.trimmed_cells > 0 {
            lines.push(format!("• Trimmed spaces in {} cells", self.trimmed_cells));
        }
        if self.case_fixed_cells > 0 {
            lines.push(format!("• Fixed text case in {} cells", self.case_fixed_cells));
        }
        if self.number_fixed_cells > 0 {
            lines.push(format!(
                "• Fixed number formatting in {} cells",
                self.number_fixed_cells
            ));
        }
        if self.duplicates_removed > 0 {
            lines.push(format!(
                "• Removed {} duplicate rows",
                self.duplicates_removed
            ));
        }
        lines.join("\n")
    }
}

impl fmt::Display for CleanupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// The cell-level steps of a one-click cleanup, in the order they run:
/// spaces, case, then number formatting.
#[derive(Debug, Clone, Default)]
pub struct CleanupPlan {
    spaces: Option<TrimOptions>,
    case: Option<CaseConverter>,
    formatting: bool,
    duplicates: bool,
}

impl CleanupPlan {
    #[must_use]
    pub fn new(operations: &[CleanupOperation], settings: &Settings) -> Self {
        let enabled = |op| operations.contains(&op);
        Self {
            spaces: enabled(CleanupOperation::Spaces).then_some(settings.trim_spaces),
            case: enabled(CleanupOperation::Case).then(|| {
                CaseConverter::from_settings(&settings.case_conversion, Some(CaseMode::Smart))
            }),
            formatting: enabled(CleanupOperation::Formatting),
            duplicates: enabled(CleanupOperation::Duplicates),
        }
    }

    /// Whether any per-cell step is enabled
    #[must_use]
    pub fn has_cell_steps(&self) -> bool {
        self.spaces.is_some() || self.case.is_some() || self.formatting
    }

    #[must_use]
    pub fn removes_duplicates(&self) -> bool {
        self.duplicates
    }

    /// Run the enabled steps on one cell; returns whether it changed at all
    pub fn clean_cell(&self, cell: &mut CellValue, report: &mut CleanupReport) -> bool {
        let mut changed = false;
        if let Some(trim) = &self.spaces {
            if trim.clean_cell(cell) {
                report.trimmed_cells += 1;
                changed = true;
            }
        }
        if let Some(case) = &self.case {
            if case.apply(cell) {
                report.case_fixed_cells += 1;
                changed = true;
            }
        }
        if self.formatting && fix_number(cell) {
            report.number_fixed_cells += 1;
            changed = true;
        }
        changed
    }

    /// Run the cell steps over a grid; returns the number of changed cells
    pub fn clean_grid(&self, grid: &mut CellGrid, report: &mut CleanupReport) -> usize {
        grid.update_cells(|cell| self.clean_cell(cell, report))
    }
}
