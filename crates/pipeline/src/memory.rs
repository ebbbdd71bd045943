use crate::error::HostError;
use crate::handle::GridHandle;
use async_trait::async_trait;
use cellscrub_sheet::{CellGrid, GridError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A [`GridHandle`] backed by a grid held in memory.
///
/// Sub-range handles share the same underlying grid, so writes through any
/// of them are visible to all.
#[derive(Debug, Clone)]
pub struct MemoryGrid {
    grid: Arc<RwLock<CellGrid>>,
    offset: usize,
    rows: usize,
    columns: usize,
}

impl MemoryGrid {
    #[must_use]
    pub fn new(grid: CellGrid) -> Self {
        let rows = grid.row_count();
        let columns = grid.column_count();
        Self {
            grid: Arc::new(RwLock::new(grid)),
            offset: 0,
            rows,
            columns,
        }
    }

    /// First row of this handle within the shared grid
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Copy of the whole shared grid, not just this handle's rows
    pub async fn snapshot(&self) -> CellGrid {
        self.grid.read().await.clone()
    }

    /// Take the shared grid out, cloning it if other handles are still alive
    pub async fn into_grid(self) -> CellGrid {
        match Arc::try_unwrap(self.grid) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().await.clone(),
        }
    }
}

impl From<CellGrid> for MemoryGrid {
    fn from(grid: CellGrid) -> Self {
        Self::new(grid)
    }
}

#[async_trait]
impl GridHandle for MemoryGrid {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn rows(&self, offset: usize, span: usize) -> Result<Self, HostError> {
        let end = offset.saturating_add(span);
        if end > self.rows {
            return Err(GridError::RowRangeOutOfBounds {
                offset,
                end,
                rows: self.rows,
            }
            .into());
        }
        Ok(Self {
            grid: Arc::clone(&self.grid),
            offset: self.offset + offset,
            rows: span,
            columns: self.columns,
        })
    }

    async fn read(&self) -> Result<CellGrid, HostError> {
        let grid = self.grid.read().await;
        Ok(grid.slice_rows(self.offset, self.rows)?)
    }

    async fn write(&self, values: CellGrid) -> Result<(), HostError> {
        if values.row_count() != self.rows || (self.rows > 0 && values.column_count() != self.columns)
        {
            return Err(HostError::ShapeMismatch {
                expected_rows: self.rows,
                expected_cols: self.columns,
                rows: values.row_count(),
                cols: values.column_count(),
            });
        }
        let mut grid = self.grid.write().await;
        grid.replace_rows(self.offset, values)?;
        Ok(())
    }
}
