use crate::error::{CleanError, Result};
use cellscrub_pipeline::GridHandle;
use cellscrub_sheet::CellGrid;
use std::collections::VecDeque;
use tracing::debug;

pub const MAX_UNDO_STACK_SIZE: usize = 10;

/// A range's values before an operation ran.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub operation: String,
    pub snapshot: CellGrid,
}

/// Bounded stack of pre-operation snapshots; the oldest entry is dropped
/// once the stack is full.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: VecDeque<UndoEntry>,
    capacity: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::with_capacity(MAX_UNDO_STACK_SIZE)
    }
}

impl UndoStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, operation: impl Into<String>, snapshot: CellGrid) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(UndoEntry {
            operation: operation.into(),
            snapshot,
        });
    }

    /// Snapshot the region behind `handle` before running `operation` on it
    pub async fn record<H: GridHandle>(&mut self, operation: &str, handle: &H) -> Result<()> {
        let snapshot = handle.read().await?;
        debug!(operation, rows = snapshot.row_count(), "recorded undo snapshot");
        self.push(operation, snapshot);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    #[must_use]
    pub fn last_operation(&self) -> Option<&str> {
        self.entries.back().map(|entry| entry.operation.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write the most recent snapshot back through `handle`.
    ///
    /// The entry stays on the stack if the write fails.
    pub async fn undo<H: GridHandle>(&mut self, handle: &H) -> Result<String> {
        let entry = self.entries.back().ok_or(CleanError::NothingToUndo)?;
        handle.write(entry.snapshot.clone()).await?;
        let operation = self
            .pop()
            .map(|entry| entry.operation)
            .unwrap_or_default();
        debug!(operation = %operation, "undo applied");
        Ok(operation)
    }
}
