use cellscrub_dates::recognize;
use cellscrub_sheet::{CellGrid, CellValue};
use serde::Serialize;
use std::collections::HashSet;

/// What a range holds, by cell type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub total_cells: usize,
    pub text_cells: usize,
    pub number_cells: usize,
    pub bool_cells: usize,
    /// Cells recognized as dates, whatever their type
    pub date_cells: usize,
    /// Empty cells and empty text
    pub empty_cells: usize,
    /// Non-empty cells repeating the value of an earlier cell
    pub duplicates: usize,
}

impl RangeSummary {
    #[must_use]
    pub fn of(grid: &CellGrid) -> Self {
        let mut summary = Self {
            total_cells: grid.cell_count(),
            ..Self::default()
        };
        let mut seen = HashSet::new();

        for cell in grid.cells() {
            match cell {
                CellValue::Empty => summary.empty_cells += 1,
                CellValue::Text(s) if s.is_empty() => summary.empty_cells += 1,
                CellValue::Text(_) => summary.text_cells += 1,
                CellValue::Number(_) => summary.number_cells += 1,
                CellValue::Bool(_) => summary.bool_cells += 1,
                CellValue::DateTime(_) => {}
            }
            if recognize(cell).is_some() {
                summary.date_cells += 1;
            }
            let blank = cell.is_empty() || cell.as_text() == Some("");
            if !blank && !seen.insert(cell.identity_key()) {
                summary.duplicates += 1;
            }
        }

        summary
    }
}
