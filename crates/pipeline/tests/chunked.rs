use async_trait::async_trait;
use cellscrub_pipeline::{
    per_cell, run_chunked, CellTransform, ChunkOptions, ChunkTransform, GridHandle, HostError,
    MemoryGrid, PipelineError, ProgressUpdate, TransformError,
};
use cellscrub_sheet::{CellGrid, CellValue, GridError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn grid_of(rows: usize) -> CellGrid {
    CellGrid::from_data((0..rows).map(|i| vec![format!("r{i}"), "x".to_string()]).collect())
        .unwrap()
}

/// Records the span of every chunk it sees and marks each row's second cell.
#[derive(Default)]
struct Recording {
    spans: Vec<(usize, usize)>,
}

#[async_trait]
impl ChunkTransform<MemoryGrid> for Recording {
    async fn apply(&mut self, chunk: &MemoryGrid) -> Result<usize, TransformError> {
        self.spans.push((chunk.offset(), chunk.row_count()));
        let mut values = chunk.read().await?;
        for row in values.rows_mut() {
            row[1] = CellValue::text("done");
        }
        let changed = values.row_count();
        chunk.write(values).await?;
        Ok(changed)
    }
}

#[tokio::test]
async fn test_large_grid_runs_in_three_chunks() {
    let handle = MemoryGrid::new(grid_of(2500));
    let mut transform = Recording::default();
    let mut updates: Vec<ProgressUpdate> = Vec::new();

    let result = run_chunked(
        &handle,
        &mut transform,
        ChunkOptions::new()
            .with_chunk_rows(1000)
            .on_progress(|update| updates.push(*update)),
    )
    .await
    .unwrap();

    assert_eq!(transform.spans, vec![(0, 1000), (1000, 1000), (2000, 500)]);
    assert_eq!(result.processed_rows, 2500);
    assert_eq!(result.changed_cells, 2500);

    assert_eq!(updates.len(), 3);
    assert!(updates
        .windows(2)
        .all(|w| w[0].percent_complete < w[1].percent_complete));
    assert_eq!(updates[0].percent_complete, 40);
    assert_eq!(updates[1].percent_complete, 80);
    assert_eq!(updates[2].percent_complete, 100);
    assert_eq!(updates[2].processed_rows, 2500);
    assert_eq!(updates[2].changed_cells, 2500);

    let after = handle.snapshot().await;
    assert!(after.rows().all(|row| row[1] == CellValue::text("done")));
}

#[tokio::test]
async fn test_small_grid_is_one_call_without_progress() {
    let handle = MemoryGrid::new(grid_of(500));
    let mut transform = Recording::default();
    let mut calls = 0;

    let result = run_chunked(
        &handle,
        &mut transform,
        ChunkOptions::new().on_progress(|_| calls += 1),
    )
    .await
    .unwrap();

    assert_eq!(transform.spans, vec![(0, 500)]);
    assert_eq!(result.processed_rows, 500);
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_trim_and_collapse_scenario() {
    let grid = CellGrid::from_data(vec![vec!["  Hello  "], vec!["World  "]]).unwrap();
    let handle = MemoryGrid::new(grid);
    let mut trim = per_cell(|cell: &mut CellValue| {
        let CellValue::Text(text) = cell else {
            return false;
        };
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned == *text {
            return false;
        }
        *text = cleaned;
        true
    });

    let result = run_chunked(&handle, &mut trim, ChunkOptions::default())
        .await
        .unwrap();

    assert_eq!(result.changed_cells, 2);
    assert_eq!(
        handle.into_grid().await,
        CellGrid::from_data(vec![vec!["Hello"], vec!["World"]]).unwrap()
    );
}

#[tokio::test]
async fn test_transform_failure_keeps_earlier_chunks() {
    let handle = MemoryGrid::new(grid_of(25));
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);

    let mut transform = CellTransform::new(move |grid: &mut CellGrid| {
        if counter.fetch_add(1, Ordering::SeqCst) == 2 {
            return Err(TransformError::failed("bad cell"));
        }
        Ok(grid.update_cells(|cell| {
            *cell = CellValue::text("seen");
            true
        }))
    });

    let err = run_chunked(&handle, &mut transform, ChunkOptions::new().with_chunk_rows(10))
        .await
        .unwrap_err();

    match &err {
        PipelineError::Transform {
            offset,
            processed_rows,
            source,
        } => {
            assert_eq!(*offset, 20);
            assert_eq!(*processed_rows, 20);
            assert_eq!(source.to_string(), "bad cell");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.offset(), Some(20));
    assert_eq!(seen.load(Ordering::SeqCst), 3);

    let after = handle.snapshot().await;
    assert_eq!(after.get(19, 0).unwrap(), &CellValue::text("seen"));
    assert_eq!(after.get(20, 0).unwrap(), &CellValue::text("r20"));
}

/// A host whose writes start failing after a number of successful ones.
#[derive(Clone)]
struct FlakyHost {
    inner: MemoryGrid,
    writes_left: Arc<AtomicUsize>,
}

#[async_trait]
impl GridHandle for FlakyHost {
    fn row_count(&self) -> usize {
        self.inner.row_count()
    }

    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    fn rows(&self, offset: usize, span: usize) -> Result<Self, HostError> {
        Ok(Self {
            inner: self.inner.rows(offset, span)?,
            writes_left: Arc::clone(&self.writes_left),
        })
    }

    async fn read(&self) -> Result<CellGrid, HostError> {
        self.inner.read().await
    }

    async fn write(&self, values: CellGrid) -> Result<(), HostError> {
        let left = self.writes_left.load(Ordering::SeqCst);
        if left == 0 {
            return Err(HostError::Unavailable("document closed".into()));
        }
        self.writes_left.store(left - 1, Ordering::SeqCst);
        self.inner.write(values).await
    }
}

#[tokio::test]
async fn test_host_failure_is_reported_with_position() {
    let host = FlakyHost {
        inner: MemoryGrid::new(grid_of(30)),
        writes_left: Arc::new(AtomicUsize::new(1)),
    };
    let mut transform = per_cell(|cell: &mut CellValue| {
        *cell = CellValue::Empty;
        true
    });

    let err = run_chunked(&host, &mut transform, ChunkOptions::new().with_chunk_rows(10))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::HostSync {
            offset: 10,
            processed_rows: 10,
            source: HostError::Unavailable(_),
        }
    ));
    assert_eq!(err.processed_rows(), 10);

    let after = host.inner.snapshot().await;
    assert_eq!(after.get(9, 0).unwrap(), &CellValue::Empty);
    assert_eq!(after.get(10, 0).unwrap(), &CellValue::text("r10"));
}

#[tokio::test]
async fn test_empty_grid() {
    let handle = MemoryGrid::new(CellGrid::new());
    let mut transform = Recording::default();
    let result = run_chunked(&handle, &mut transform, ChunkOptions::default())
        .await
        .unwrap();
    assert_eq!(result.processed_rows, 0);
    assert_eq!(result.changed_cells, 0);
}

/// A host that keeps raw rows, as a spreadsheet bridge would before any
/// validation.
struct RaggedHost {
    rows: Vec<Vec<CellValue>>,
}

#[async_trait]
impl GridHandle for RaggedHost {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn check_shape(&self) -> Result<(), GridError> {
        CellGrid::from_rows(self.rows.clone()).map(|_| ())
    }

    fn rows(&self, offset: usize, span: usize) -> Result<Self, HostError> {
        Ok(Self {
            rows: self.rows[offset..offset + span].to_vec(),
        })
    }

    async fn read(&self) -> Result<CellGrid, HostError> {
        Ok(CellGrid::from_rows(self.rows.clone())?)
    }

    async fn write(&self, _values: CellGrid) -> Result<(), HostError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_ragged_region_is_rejected_before_any_chunk() {
    let host = RaggedHost {
        rows: vec![
            vec![CellValue::text("a"), CellValue::text("b")],
            vec![CellValue::text("c")],
        ],
    };
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut transform = per_cell(move |_: &mut CellValue| {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    });

    let err = run_chunked(&host, &mut transform, ChunkOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::MalformedGrid(GridError::MalformedShape {
            row: 1,
            expected: 2,
            actual: 1,
        })
    ));
    assert_eq!(err.offset(), None);
    assert_eq!(err.processed_rows(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
