use cellscrub_sheet::GridError;
use thiserror::Error;

/// Failure raised by the grid-access collaborator on read or write
#[derive(Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Write of {rows}x{cols} values does not fit a {expected_rows}x{expected_cols} region")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Host unavailable: {0}")]
    Unavailable(String),
}

/// Failure raised by a caller-supplied chunk transform
#[derive(Error, Debug)]
pub enum TransformError {
    /// The transform's own read or write through the handle failed
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl TransformError {
    pub fn failed(message: impl Into<String>) -> Self {
        TransformError::Failed(message.into())
    }

    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TransformError::Other(Box::new(error))
    }
}

/// Errors surfaced by [`run_chunked`](crate::run_chunked).
///
/// Failures past the shape check carry the failing chunk's row offset and
/// how many rows were fully processed before it. Rows written by completed
/// chunks stay written.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Malformed grid: {0}")]
    MalformedGrid(#[from] GridError),

    #[error("Transform failed at row {offset} after {processed_rows} rows: {source}")]
    Transform {
        offset: usize,
        processed_rows: usize,
        #[source]
        source: TransformError,
    },

    #[error("Host sync failed at row {offset} after {processed_rows} rows: {source}")]
    HostSync {
        offset: usize,
        processed_rows: usize,
        #[source]
        source: HostError,
    },
}

impl PipelineError {
    /// Row offset of the chunk that failed, if a chunk was running
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            PipelineError::MalformedGrid(_) => None,
            PipelineError::Transform { offset, .. } | PipelineError::HostSync { offset, .. } => {
                Some(*offset)
            }
        }
    }

    /// Rows completed before the failure
    #[must_use]
    pub fn processed_rows(&self) -> usize {
        match self {
            PipelineError::MalformedGrid(_) => 0,
            PipelineError::Transform { processed_rows, .. }
            | PipelineError::HostSync { processed_rows, .. } => *processed_rows,
        }
    }

    /// Attach chunk position to a transform failure. Host failures raised
    /// from inside the transform are reported as host sync failures.
    pub(crate) fn at_chunk(offset: usize, processed_rows: usize, error: TransformError) -> Self {
        match error {
            TransformError::Host(source) => PipelineError::HostSync {
                offset,
                processed_rows,
                source,
            },
            source => PipelineError::Transform {
                offset,
                processed_rows,
                source,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
