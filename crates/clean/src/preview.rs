use cellscrub_sheet::{CellGrid, CellValue};
use serde::{Deserialize, Serialize};

/// Preview settings (`preview.*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewSettings {
    pub automatic_previews: bool,
    pub preview_rows: usize,
    pub preview_columns: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            automatic_previews: true,
            preview_rows: 5,
            preview_columns: 3,
        }
    }
}

/// Before/after view of the top-left corner of a range.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub before: CellGrid,
    pub after: CellGrid,
    pub total_rows: usize,
    pub total_columns: usize,
    /// Changed cells inside the previewed corner
    pub changed_cells: usize,
    /// The corner is smaller than the range
    pub has_more_data: bool,
    /// Changes expected over the whole range
    pub estimated_changes: usize,
}

impl Preview {
    /// Run a per-cell transform over the corner only and extrapolate the
    /// change rate to the whole range.
    pub fn generate<F>(grid: &CellGrid, max_rows: usize, max_cols: usize, mut f: F) -> Self
    where
        F: FnMut(&mut CellValue) -> bool,
    {
        let before = grid.top_left(max_rows, max_cols);
        let mut after = before.clone();
        after.update_cells(&mut f);

        let changed_cells = count_changed(&before, &after);
        let sampled = before.cell_count();
        let estimated_changes = if sampled == 0 {
            0
        } else {
            ((changed_cells as f64 / sampled as f64) * grid.cell_count() as f64).round() as usize
        };

        Self::assemble(grid, before, after, changed_cells, estimated_changes)
    }

    /// Compare a range with its fully transformed copy; the estimate is the
    /// exact number of changed cells.
    #[must_use]
    pub fn compare(original: &CellGrid, transformed: &CellGrid, max_rows: usize, max_cols: usize) -> Self {
        let before = original.top_left(max_rows, max_cols);
        let after = transformed.top_left(max_rows, max_cols);
        let changed_cells = count_changed(&before, &after);
        let estimated_changes = count_changed(original, transformed);
        Self::assemble(original, before, after, changed_cells, estimated_changes)
    }

    fn assemble(
        grid: &CellGrid,
        before: CellGrid,
        after: CellGrid,
        changed_cells: usize,
        estimated_changes: usize,
    ) -> Self {
        let has_more_data =
            before.row_count() < grid.row_count() || before.column_count() < grid.column_count();
        Self {
            before,
            after,
            total_rows: grid.row_count(),
            total_columns: grid.column_count(),
            changed_cells,
            has_more_data,
            estimated_changes,
        }
    }
}

fn count_changed(before: &CellGrid, after: &CellGrid) -> usize {
    before
        .cells()
        .zip(after.cells())
        .filter(|(a, b)| a != b)
        .count()
}
