use cellscrub_sheet::{CellGrid, CellValue};
use std::collections::HashSet;

fn row_key(row: &[CellValue]) -> Vec<String> {
    row.iter().map(CellValue::identity_key).collect()
}

/// Drop repeated rows, keeping each first occurrence in place order.
///
/// Rows compare equal only when every cell has the same type and value. The
/// grid keeps its shape: freed rows at the bottom become empty. Returns the
/// number of rows removed.
pub fn remove_duplicate_rows(grid: &mut CellGrid) -> usize {
    if grid.row_count() <= 1 {
        return 0;
    }
    let mut seen = HashSet::with_capacity(grid.row_count());
    grid.retain_rows_padded(|row| seen.insert(row_key(row)))
}

/// Number of rows that repeat an earlier row
#[must_use]
pub fn count_duplicate_rows(grid: &CellGrid) -> usize {
    let mut seen = HashSet::with_capacity(grid.row_count());
    grid.rows().filter(|row| !seen.insert(row_key(row))).count()
}
