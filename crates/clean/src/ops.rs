//! Operations over a host region, each driven through the chunked pipeline.

use crate::case::CaseConverter;
use crate::cleanup::{CleanupOperation, CleanupPlan, CleanupReport};
use crate::dates::{DateFormatSettings, DateStandardizer};
use crate::duplicates::remove_duplicate_rows;
use crate::error::Result;
use crate::numbers::fix_number;
use crate::replace::Replacer;
use crate::settings::Settings;
use crate::trim::TrimOptions;
use cellscrub_dates::{OutputPattern, PatternId, PatternTally};
use cellscrub_pipeline::{per_cell, run_chunked, CellTransform, ChunkOptions, GridHandle, TransformResult};
use cellscrub_sheet::CellGrid;
use tracing::info;

/// Outcome of a find/replace run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
    pub processed_rows: usize,
    pub cells_affected: usize,
    pub replacements: usize,
}

/// Outcome of a date standardization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStandardization {
    /// Most common layout found, when detection ran and found dates
    pub detected: Option<PatternId>,
    pub target: OutputPattern,
    pub result: TransformResult,
}

pub async fn trim_spaces<H: GridHandle>(
    handle: &H,
    options: TrimOptions,
    chunk: ChunkOptions<'_>,
) -> Result<TransformResult> {
    let mut transform = per_cell(|cell| options.clean_cell(cell));
    let result = run_chunked(handle, &mut transform, chunk).await?;
    info!(changed = result.changed_cells, "trimmed spaces");
    Ok(result)
}

pub async fn convert_case<H: GridHandle>(
    handle: &H,
    converter: &CaseConverter,
    chunk: ChunkOptions<'_>,
) -> Result<TransformResult> {
    let mut transform = per_cell(|cell| converter.apply(cell));
    let result = run_chunked(handle, &mut transform, chunk).await?;
    info!(mode = %converter.mode(), changed = result.changed_cells, "converted case");
    Ok(result)
}

/// Text cells that are plain numbers become numeric cells
pub async fn fix_numbers<H: GridHandle>(handle: &H, chunk: ChunkOptions<'_>) -> Result<TransformResult> {
    let mut transform = per_cell(fix_number);
    let result = run_chunked(handle, &mut transform, chunk).await?;
    info!(changed = result.changed_cells, "fixed number formats");
    Ok(result)
}

pub async fn find_replace<H: GridHandle>(
    handle: &H,
    replacer: &Replacer,
    chunk: ChunkOptions<'_>,
) -> Result<ReplaceSummary> {
    let mut replacements = 0;
    let result = {
        let mut transform = per_cell(|cell| {
            let count = replacer.apply(cell);
            replacements += count;
            count > 0
        });
        run_chunked(handle, &mut transform, chunk).await?
    };
    info!(
        cells = result.changed_cells,
        replacements, "find and replace complete"
    );
    Ok(ReplaceSummary {
        processed_rows: result.processed_rows,
        cells_affected: result.changed_cells,
        replacements,
    })
}

/// Count date layouts chunk by chunk without writing anything back
pub async fn detect_date_pattern<H: GridHandle>(
    handle: &H,
    chunk: ChunkOptions<'_>,
) -> Result<PatternTally> {
    let mut tally = PatternTally::new();
    {
        let mut transform = CellTransform::new(|grid: &mut CellGrid| {
            tally.observe_grid(grid);
            Ok(0)
        });
        run_chunked(handle, &mut transform, chunk).await?;
    }
    info!(dates = tally.total(), dominant = ?tally.dominant(), "date detection complete");
    Ok(tally)
}

/// Rewrite every recognized date in one layout.
///
/// With `detect_existing` the region is scanned first and its most common
/// layout becomes the target; progress is reported for the rewrite pass
/// only.
pub async fn standardize_dates<H: GridHandle>(
    handle: &H,
    settings: &DateFormatSettings,
    chunk: ChunkOptions<'_>,
) -> Result<DateStandardization> {
    let detected = if settings.detect_existing {
        let scan = ChunkOptions::new().with_chunk_rows(chunk.chunk_row_size);
        detect_date_pattern(handle, scan).await?.dominant()
    } else {
        None
    };

    let standardizer = DateStandardizer::from_settings(settings, detected);
    let mut transform = per_cell(|cell| standardizer.apply(cell));
    let result = run_chunked(handle, &mut transform, chunk).await?;
    info!(
        target = %standardizer.target(),
        changed = result.changed_cells,
        "standardized dates"
    );
    Ok(DateStandardization {
        detected,
        target: standardizer.target(),
        result,
    })
}

/// Remove repeated rows over the whole region; returns how many went.
///
/// Needs every row at once, so it bypasses chunking.
pub async fn remove_duplicates<H: GridHandle>(handle: &H) -> Result<usize> {
    let mut grid = handle.read().await?;
    let removed = remove_duplicate_rows(&mut grid);
    if removed > 0 {
        handle.write(grid).await?;
    }
    info!(removed, "removed duplicate rows");
    Ok(removed)
}

/// Run the enabled cleanup steps: one chunked pass for spaces, case and
/// number formatting, then duplicate removal over the whole region.
pub async fn one_click_cleanup<H: GridHandle>(
    handle: &H,
    operations: &[CleanupOperation],
    settings: &Settings,
    chunk: ChunkOptions<'_>,
) -> Result<CleanupReport> {
    let plan = CleanupPlan::new(operations, settings);
    let mut report = CleanupReport::default();

    if plan.has_cell_steps() {
        let mut transform =
            CellTransform::new(|grid: &mut CellGrid| Ok(plan.clean_grid(grid, &mut report)));
        run_chunked(handle, &mut transform, chunk).await?;
    }

    if plan.removes_duplicates() && handle.row_count() > 1 {
        report.duplicates_removed = remove_duplicates(handle).await?;
    }

    info!(
        trimmed = report.trimmed_cells,
        case_fixed = report.case_fixed_cells,
        numbers_fixed = report.number_fixed_cells,
        duplicates = report.duplicates_removed,
        "one-click cleanup complete"
    );
    Ok(report)
}
