use crate::pattern::PatternId;
use crate::recognize::recognize;
use cellscrub_sheet::{CellGrid, CellValue};
use indexmap::IndexMap;

/// Pattern reported when nothing in a grid is a date.
pub const DEFAULT_PATTERN: PatternId = PatternId::Us;

/// Running count of recognized patterns, in first-seen order.
///
/// Can be fed chunk by chunk; the result only depends on the order the
/// cells were seen in.
#[derive(Debug, Clone, Default)]
pub struct PatternTally {
    counts: IndexMap<PatternId, usize>,
}

impl PatternTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cell; returns the recognized pattern, if any
    pub fn observe(&mut self, value: &CellValue) -> Option<PatternId> {
        let pattern = recognize(value)?.pattern;
        *self.counts.entry(pattern).or_insert(0) += 1;
        Some(pattern)
    }

    /// Record every cell of a grid in row-major order
    pub fn observe_grid(&mut self, grid: &CellGrid) -> usize {
        grid.cells()
            .filter(|cell| self.observe(cell).is_some())
            .count()
    }

    /// How many cells were recognized with `pattern`
    #[must_use]
    pub fn count(&self, pattern: PatternId) -> usize {
        self.counts.get(&pattern).copied().unwrap_or(0)
    }

    /// Total recognized cells
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Most frequent pattern; ties go to the pattern seen first.
    #[must_use]
    pub fn dominant(&self) -> Option<PatternId> {
        let mut best: Option<(PatternId, usize)> = None;
        for (&pattern, &count) in &self.counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((pattern, count));
            }
        }
        best.map(|(pattern, _)| pattern)
    }

    /// Counts in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, usize)> + '_ {
        self.counts.iter().map(|(pattern, count)| (*pattern, *count))
    }
}

/// The most frequent source pattern in a grid, or `us` if no cell is a date.
///
/// ```
/// use cellscrub_dates::{dominant_pattern, PatternId};
/// use cellscrub_sheet::CellGrid;
///
/// let grid = CellGrid::from_data(vec![
///     vec!["2023-01-15", "01/15/2023"],
///     vec!["2023-02-01", "hello"],
/// ])
/// .unwrap();
/// assert_eq!(dominant_pattern(&grid), PatternId::Iso);
/// ```
#[must_use]
pub fn dominant_pattern(grid: &CellGrid) -> PatternId {
    let mut tally = PatternTally::new();
    tally.observe_grid(grid);
    tally.dominant().unwrap_or(DEFAULT_PATTERN)
}
