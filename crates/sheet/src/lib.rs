//! Cell and grid types for cellscrub
//!
//! Provides the scalar cell value, the rectangular grid every cleaning
//! operation works on, and CSV import/export.
//!
//! # Examples
//!
//! ```
//! use cellscrub_sheet::{CellGrid, CellValue};
//!
//! let grid = CellGrid::from_data(vec![
//!     vec!["Name", "Joined"],
//!     vec!["Alice", "2023-01-15"],
//! ])
//! .unwrap();
//!
//! assert_eq!(grid.row_count(), 2);
//! assert_eq!(grid.column_count(), 2);
//! assert_eq!(grid.get(1, 0).unwrap(), &CellValue::text("Alice"));
//! ```
//!
//! Ragged input is rejected up front:
//!
//! ```
//! use cellscrub_sheet::{CellGrid, GridError};
//!
//! let err = CellGrid::from_data(vec![vec!["a", "b"], vec!["c"]]).unwrap_err();
//! assert!(matches!(err, GridError::MalformedShape { row: 1, .. }));
//! ```

mod cell;
mod csv;
mod error;
mod grid;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export grid error types.
pub use error::{GridError, Result};
/// Re-export grid type.
pub use grid::CellGrid;
