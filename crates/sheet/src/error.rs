use thiserror::Error;

/// Errors that can occur during grid operations
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Malformed grid: row {row} has {actual} cells, expected {expected}")]
    MalformedShape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Index out of bounds: row {row}, col {col} (grid has {rows} rows, {cols} cols)")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Row range out of bounds: {offset}..{end} (grid has {rows} rows)")]
    RowRangeOutOfBounds {
        offset: usize,
        end: usize,
        rows: usize,
    },

    #[error("Shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
