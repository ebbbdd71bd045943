//! # cellscrub-pipeline
//!
//! Applies a transform across a grid of any size without handing more than a
//! bounded number of rows to it at once.
//!
//! The grid lives behind a [`GridHandle`]; [`MemoryGrid`] is the in-process
//! implementation. Chunks run strictly one after another and the runtime
//! gets control back between them.
//!
//! ```
//! use cellscrub_pipeline::{per_cell, run_chunked, ChunkOptions, MemoryGrid};
//! use cellscrub_sheet::{CellGrid, CellValue};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let grid = CellGrid::from_data(vec![vec!["a"], vec!["b"], vec!["c"]]).unwrap();
//! let handle = MemoryGrid::new(grid);
//! let mut upper = per_cell(|cell: &mut CellValue| match cell {
//!     CellValue::Text(s) => {
//!         *s = s.to_uppercase();
//!         true
//!     }
//!     _ => false,
//! });
//!
//! let result = run_chunked(&handle, &mut upper, ChunkOptions::new().with_chunk_rows(2))
//!     .await
//!     .unwrap();
//! assert_eq!(result.processed_rows, 3);
//! assert_eq!(result.changed_cells, 3);
//! # });
//! ```

mod chunked;
mod error;
mod handle;
mod memory;

pub use chunked::{
    per_cell, run_chunked, CellTransform, ChunkOptions, ChunkPlan, ChunkTransform, ProgressUpdate,
    TransformResult, DEFAULT_CHUNK_ROWS,
};
pub use error::{HostError, PipelineError, Result, TransformError};
pub use handle::GridHandle;
pub use memory::MemoryGrid;
