use crate::cell::CellValue;
use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};

/// A rectangular 2D grid of cells (row-major storage).
///
/// Every row has the same number of cells. The mutable API hands out cell and
/// row-slice references only, so row and column counts stay fixed once the
/// grid is built. Deserialization goes through [`CellGrid::from_rows`], so a
/// ragged row list is rejected there too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<CellValue>>", into = "Vec<Vec<CellValue>>")]
pub struct CellGrid {
    rows: Vec<Vec<CellValue>>,
    column_count: usize,
}

impl CellGrid {
    /// Create an empty grid (no rows, no columns)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid of `rows` x `cols` empty cells
    #[must_use]
    pub fn filled(rows: usize, cols: usize) -> Self {
        CellGrid {
            rows: vec![vec![CellValue::Empty; cols]; rows],
            column_count: cols,
        }
    }

    /// Build a grid from rows, rejecting rows of differing length.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let column_count = rows.first().map_or(0, Vec::len);
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != column_count)
        {
            return Err(GridError::MalformedShape {
                row,
                expected: column_count,
                actual: cells.len(),
            });
        }
        Ok(CellGrid { rows, column_count })
    }

    /// Build a grid from anything convertible into cell values
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Result<Self> {
        Self::from_rows(
            data.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Total number of cells
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.column_count
    }

    /// Check if the grid has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or_else(|| self.out_of_bounds(row, col))
    }

    /// Get a mutable cell reference by row and column index (0-based)
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut CellValue> {
        let err = self.out_of_bounds(row, col);
        self.rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(err)
    }

    /// Set a cell value by row and column index (0-based)
    pub fn set<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        *self.get_mut(row, col)? = value.into();
        Ok(())
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterate over rows mutably; rows are slices so their length cannot change
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [CellValue]> {
        self.rows.iter_mut().map(Vec::as_mut_slice)
    }

    /// Iterate over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().flatten()
    }

    /// Iterate over every cell mutably in row-major order
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut CellValue> {
        self.rows.iter_mut().flatten()
    }

    /// Apply `f` to every cell, counting the cells it reports as changed.
    pub fn update_cells<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&mut CellValue) -> bool,
    {
        self.cells_mut().map(|cell| f(cell)).filter(|changed| *changed).count()
    }

    /// Copy out a contiguous range of rows at the full column span
    pub fn slice_rows(&self, offset: usize, span: usize) -> Result<CellGrid> {
        let end = self.checked_row_end(offset, span)?;
        Ok(CellGrid {
            rows: self.rows[offset..end].to_vec(),
            column_count: self.column_count,
        })
    }

    /// Overwrite the rows starting at `offset` with a grid of matching width
    pub fn replace_rows(&mut self, offset: usize, replacement: CellGrid) -> Result<()> {
        let end = self.checked_row_end(offset, replacement.row_count())?;
        if replacement.row_count() > 0 && replacement.column_count != self.column_count {
            return Err(GridError::ShapeMismatch {
                expected_rows: replacement.row_count(),
                expected_cols: self.column_count,
                rows: replacement.row_count(),
                cols: replacement.column_count,
            });
        }
        for (slot, row) in self.rows[offset..end].iter_mut().zip(replacement.rows) {
            *slot = row;
        }
        Ok(())
    }

    /// Keep the rows `keep` accepts, in order, and pad the bottom with empty
    /// rows so the shape does not change. Returns how many rows were dropped.
    pub fn retain_rows_padded<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        let removed = before - self.rows.len();
        let width = self.column_count;
        self.rows.resize_with(before, || vec![CellValue::Empty; width]);
        removed
    }

    /// A copy of the first `row_count` rows (or the whole grid if shorter)
    #[must_use]
    pub fn truncated(&self, row_count: usize) -> CellGrid {
        CellGrid {
            rows: self.rows.iter().take(row_count).cloned().collect(),
            column_count: self.column_count,
        }
    }

    /// A copy of the top-left corner of at most `rows` x `cols` cells
    #[must_use]
    pub fn top_left(&self, rows: usize, cols: usize) -> CellGrid {
        let cols = cols.min(self.column_count);
        CellGrid {
            rows: self
                .rows
                .iter()
                .take(rows)
                .map(|row| row.iter().take(cols).cloned().collect())
                .collect(),
            column_count: cols,
        }
    }

    /// Consume the grid, returning its rows
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    fn checked_row_end(&self, offset: usize, span: usize) -> Result<usize> {
        let end = offset.saturating_add(span);
        if end > self.rows.len() {
            return Err(GridError::RowRangeOutOfBounds {
                offset,
                end,
                rows: self.rows.len(),
            });
        }
        Ok(end)
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> GridError {
        GridError::IndexOutOfBounds {
            row,
            col,
            rows: self.row_count(),
            cols: self.column_count,
        }
    }
}

impl TryFrom<Vec<Vec<CellValue>>> for CellGrid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<CellValue>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<CellGrid> for Vec<Vec<CellValue>> {
    fn from(grid: CellGrid) -> Self {
        grid.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = CellGrid::from_data(vec![vec!["a", "b"], vec!["c"]]).unwrap_err();
        assert!(matches!(
            err,
            GridError::MalformedShape {
                row: 1,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_dimensions() {
        let grid = CellGrid::from_data(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.cell_count(), 6);
        assert_eq!(grid.get(1, 2).unwrap(), &CellValue::Number(6.0));
        assert!(grid.get(2, 0).is_err());
    }

    #[test]
    fn test_slice_and_replace_rows() {
        let mut grid = CellGrid::from_data(vec![vec![1], vec![2], vec![3], vec![4]]).unwrap();
        let slice = grid.slice_rows(1, 2).unwrap();
        assert_eq!(slice.row_count(), 2);
        assert_eq!(slice.get(0, 0).unwrap(), &CellValue::Number(2.0));

        let replacement = CellGrid::from_data(vec![vec!["x"], vec!["y"]]).unwrap();
        grid.replace_rows(2, replacement).unwrap();
        assert_eq!(grid.get(2, 0).unwrap(), &CellValue::text("x"));
        assert_eq!(grid.get(3, 0).unwrap(), &CellValue::text("y"));
        assert!(grid.slice_rows(3, 2).is_err());
    }

    #[test]
    fn test_retain_rows_padded_keeps_shape() {
        let mut grid = CellGrid::from_data(vec![vec!["a", "1"], vec!["b", "2"], vec!["c", "3"]])
            .unwrap();
        let removed = grid.retain_rows_padded(|row| row[0] != CellValue::text("b"));
        assert_eq!(removed, 1);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.get(1, 0).unwrap(), &CellValue::text("c"));
        assert!(grid.rows().nth(2).unwrap().iter().all(CellValue::is_empty));
    }

    #[test]
    fn test_replace_rows_rejects_width_mismatch() {
        let mut grid = CellGrid::filled(2, 2);
        let narrow = CellGrid::from_data(vec![vec!["x"]]).unwrap();
        assert!(matches!(
            grid.replace_rows(0, narrow),
            Err(GridError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_update_cells_counts_changes() {
        let mut grid = CellGrid::from_data(vec![vec!["a", "B"], vec!["c", "D"]]).unwrap();
        let changed = grid.update_cells(|cell| match cell {
            CellValue::Text(s) if s.chars().any(char::is_lowercase) => {
                *s = s.to_uppercase();
                true
            }
            _ => false,
        });
        assert_eq!(changed, 2);
        assert_eq!(grid.get(1, 0).unwrap(), &CellValue::text("C"));
    }

    #[test]
    fn test_top_left() {
        let grid = CellGrid::from_data(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap();
        let corner = grid.top_left(2, 2);
        assert_eq!(corner.row_count(), 2);
        assert_eq!(corner.column_count(), 2);
        assert_eq!(corner.get(1, 1).unwrap(), &CellValue::Number(5.0));

        let wide = grid.top_left(5, 10);
        assert_eq!(wide.row_count(), 3);
        assert_eq!(wide.column_count(), 3);
    }

    #[test]
    fn test_try_from_rows_checks_shape() {
        let ragged = vec![vec![CellValue::Empty, CellValue::Empty], vec![CellValue::Empty]];
        assert!(CellGrid::try_from(ragged).is_err());

        let grid = CellGrid::try_from(vec![vec![CellValue::Bool(true)]]).unwrap();
        let rows: Vec<Vec<CellValue>> = grid.into();
        assert_eq!(rows, vec![vec![CellValue::Bool(true)]]);
    }
}
