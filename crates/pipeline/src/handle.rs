use crate::error::HostError;
use async_trait::async_trait;
use cellscrub_sheet::{CellGrid, GridError};

/// A rectangular region addressable within a host document.
///
/// The pipeline only ever asks a handle for its shape, for a sub-handle over
/// a contiguous row range at the same column span, and for one read and one
/// write of that region's values.
#[async_trait]
pub trait GridHandle: Send + Sync {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Confirm every row spans [`column_count`](Self::column_count) cells.
    ///
    /// Hosts that hand out values they did not build through [`CellGrid`]
    /// report a ragged region here. [`CellGrid`] is rectangular already, so
    /// the default accepts.
    fn check_shape(&self) -> Result<(), GridError> {
        Ok(())
    }

    /// Handle to rows `offset..offset + span` of this region
    fn rows(&self, offset: usize, span: usize) -> Result<Self, HostError>
    where
        Self: Sized;

    /// Read the region's values
    async fn read(&self) -> Result<CellGrid, HostError>;

    /// Write back a grid with the region's exact shape
    async fn write(&self, values: CellGrid) -> Result<(), HostError>;
}
