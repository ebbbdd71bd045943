use crate::error::{PipelineError, Result, TransformError};
use crate::handle::GridHandle;
use async_trait::async_trait;
use cellscrub_sheet::{CellGrid, CellValue};
use tracing::debug;

/// Rows handed to a transform at once unless configured otherwise.
pub const DEFAULT_CHUNK_ROWS: usize = 1000;

/// How a grid of `total_rows` is split into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub total_rows: usize,
    pub chunk_row_size: usize,
    pub chunk_count: usize,
}

impl ChunkPlan {
    /// A chunk size of zero means [`DEFAULT_CHUNK_ROWS`].
    #[must_use]
    pub fn new(total_rows: usize, chunk_row_size: usize) -> Self {
        let chunk_row_size = if chunk_row_size == 0 {
            DEFAULT_CHUNK_ROWS
        } else {
            chunk_row_size
        };
        Self {
            total_rows,
            chunk_row_size,
            chunk_count: total_rows.div_ceil(chunk_row_size),
        }
    }

    /// Whether the whole grid fits in one transform call
    #[must_use]
    pub fn is_single_pass(&self) -> bool {
        self.total_rows <= self.chunk_row_size
    }

    /// `(offset, span)` of every chunk in increasing offset order
    pub fn chunks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.chunk_count).map(move |index| {
            let offset = index * self.chunk_row_size;
            (offset, self.chunk_row_size.min(self.total_rows - offset))
        })
    }
}

/// Reported after every completed chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub processed_rows: usize,
    pub total_rows: usize,
    /// Rounded to the nearest whole percent
    pub percent_complete: u32,
    pub changed_cells: usize,
}

impl ProgressUpdate {
    fn new(processed_rows: usize, total_rows: usize, changed_cells: usize) -> Self {
        let percent_complete = if total_rows == 0 {
            100
        } else {
            ((processed_rows as f64 / total_rows as f64) * 100.0).round() as u32
        };
        Self {
            processed_rows,
            total_rows,
            percent_complete,
            changed_cells,
        }
    }
}

type ProgressCallback<'a> = Box<dyn FnMut(&ProgressUpdate) + Send + 'a>;

/// Options for [`run_chunked`].
pub struct ChunkOptions<'a> {
    pub chunk_row_size: usize,
    on_progress: Option<ProgressCallback<'a>>,
}

impl Default for ChunkOptions<'_> {
    fn default() -> Self {
        Self {
            chunk_row_size: DEFAULT_CHUNK_ROWS,
            on_progress: None,
        }
    }
}

impl<'a> ChunkOptions<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chunk_rows(mut self, rows: usize) -> Self {
        self.chunk_row_size = rows;
        self
    }

    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ProgressUpdate) + Send + 'a,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    fn report(&mut self, update: &ProgressUpdate) {
        if let Some(callback) = self.on_progress.as_mut() {
            callback(update);
        }
    }
}

impl std::fmt::Debug for ChunkOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkOptions")
            .field("chunk_row_size", &self.chunk_row_size)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformResult {
    pub processed_rows: usize,
    pub changed_cells: usize,
}

/// Work applied to one chunk; returns how many cells it changed.
///
/// The chunk handle is exclusively the transform's for the duration of the
/// call.
#[async_trait]
pub trait ChunkTransform<H: GridHandle>: Send {
    async fn apply(&mut self, chunk: &H) -> std::result::Result<usize, TransformError>;
}

/// Adapts a synchronous grid function into a [`ChunkTransform`]: one read,
/// the function, and one write when anything changed.
pub struct CellTransform<F> {
    f: F,
}

impl<F> CellTransform<F>
where
    F: FnMut(&mut CellGrid) -> std::result::Result<usize, TransformError> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<H, F> ChunkTransform<H> for CellTransform<F>
where
    H: GridHandle,
    F: FnMut(&mut CellGrid) -> std::result::Result<usize, TransformError> + Send,
{
    async fn apply(&mut self, chunk: &H) -> std::result::Result<usize, TransformError> {
        let mut values = chunk.read().await?;
        let changed = (self.f)(&mut values)?;
        if changed > 0 {
            chunk.write(values).await?;
        }
        Ok(changed)
    }
}

/// Transform that rewrites cells one at a time; `f` returns whether it
/// changed the cell.
pub fn per_cell<G>(
    mut f: G,
) -> CellTransform<impl FnMut(&mut CellGrid) -> std::result::Result<usize, TransformError> + Send>
where
    G: FnMut(&mut CellValue) -> bool + Send,
{
    CellTransform::new(move |grid: &mut CellGrid| Ok(grid.update_cells(&mut f)))
}

/// Apply `transform` over the whole region behind `handle` in bounded chunks.
///
/// A region that fits in one chunk is handed over whole and reports no
/// progress. Larger regions are walked in increasing row order, one chunk at
/// a time, yielding to the runtime between chunks. A handle that fails its
/// shape check is rejected before the transform runs. The first failure stops
/// the run; rows written by earlier chunks are not rolled back.
pub async fn run_chunked<H, T>(
    handle: &H,
    transform: &mut T,
    mut options: ChunkOptions<'_>,
) -> Result<TransformResult>
where
    H: GridHandle,
    T: ChunkTransform<H> + ?Sized,
{
    handle.check_shape()?;
    let plan = ChunkPlan::new(handle.row_count(), options.chunk_row_size);

    if plan.is_single_pass() {
        let changed_cells = transform
            .apply(handle)
            .await
            .map_err(|e| PipelineError::at_chunk(0, 0, e))?;
        debug!(rows = plan.total_rows, changed_cells, "single pass complete");
        return Ok(TransformResult {
            processed_rows: plan.total_rows,
            changed_cells,
        });
    }

    debug!(
        rows = plan.total_rows,
        chunk_rows = plan.chunk_row_size,
        chunks = plan.chunk_count,
        "starting chunked run"
    );

    let mut result = TransformResult::default();
    for (offset, span) in plan.chunks() {
        let chunk = handle
            .rows(offset, span)
            .map_err(|source| PipelineError::HostSync {
                offset,
                processed_rows: result.processed_rows,
                source,
            })?;

        let changed = transform
            .apply(&chunk)
            .await
            .map_err(|e| PipelineError::at_chunk(offset, result.processed_rows, e))?;

        result.changed_cells += changed;
        result.processed_rows += span;
        debug!(offset, span, changed, "chunk complete");

        options.report(&ProgressUpdate::new(
            result.processed_rows,
            plan.total_rows,
            result.changed_cells,
        ));

        tokio::task::yield_now().await;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_splits_remainder_last() {
        let plan = ChunkPlan::new(2500, 1000);
        assert_eq!(plan.chunk_count, 3);
        assert!(!plan.is_single_pass());
        assert_eq!(
            plan.chunks().collect::<Vec<_>>(),
            vec![(0, 1000), (1000, 1000), (2000, 500)]
        );
    }

    #[test]
    fn test_plan_exact_multiple() {
        let plan = ChunkPlan::new(2000, 1000);
        assert_eq!(plan.chunk_count, 2);
        assert_eq!(plan.chunks().last(), Some((1000, 1000)));
    }

    #[test]
    fn test_plan_small_and_empty() {
        assert!(ChunkPlan::new(500, 1000).is_single_pass());
        assert!(ChunkPlan::new(1000, 1000).is_single_pass());
        let empty = ChunkPlan::new(0, 1000);
        assert!(empty.is_single_pass());
        assert_eq!(empty.chunk_count, 0);
    }

    #[test]
    fn test_zero_chunk_size_uses_default() {
        let small = ChunkPlan::new(3, 0);
        assert_eq!(small.chunk_row_size, DEFAULT_CHUNK_ROWS);
        assert!(small.is_single_pass());

        let large = ChunkPlan::new(2500, 0);
        assert_eq!(large, ChunkPlan::new(2500, DEFAULT_CHUNK_ROWS));
        assert_eq!(large.chunk_count, 3);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(ProgressUpdate::new(1, 3, 0).percent_complete, 33);
        assert_eq!(ProgressUpdate::new(2, 3, 0).percent_complete, 67);
        assert_eq!(ProgressUpdate::new(3, 3, 0).percent_complete, 100);
    }
}
