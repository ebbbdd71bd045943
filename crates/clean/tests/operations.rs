use cellscrub_clean::ops::{
    convert_case, detect_date_pattern, find_replace, fix_numbers, one_click_cleanup,
    remove_duplicates, standardize_dates, trim_spaces,
};
use cellscrub_clean::{
    CaseConverter, CaseMode, CleanError, CleanupOperation, DateFormatSettings, ReplaceError,
    ReplaceOptions, Replacer, Settings, TrimOptions, UndoStack,
};
use cellscrub_dates::{OutputPattern, PatternId};
use cellscrub_pipeline::{ChunkOptions, MemoryGrid, ProgressUpdate};
use cellscrub_sheet::{CellGrid, CellValue};

fn handle_of(rows: Vec<Vec<&str>>) -> MemoryGrid {
    MemoryGrid::new(CellGrid::from_data(rows).unwrap())
}

async fn values(handle: &MemoryGrid) -> CellGrid {
    handle.snapshot().await
}

#[tokio::test]
async fn test_trim_two_rows() {
    let handle = handle_of(vec![vec!["  Hello  "], vec!["World  "]]);
    let result = trim_spaces(&handle, TrimOptions::default(), ChunkOptions::new())
        .await
        .unwrap();

    assert_eq!(result.changed_cells, 2);
    assert_eq!(result.processed_rows, 2);
    assert_eq!(
        values(&handle).await,
        CellGrid::from_data(vec![vec!["Hello"], vec!["World"]]).unwrap()
    );
}

#[tokio::test]
async fn test_case_conversion_reports_progress() {
    let rows: Vec<Vec<String>> = (0..25).map(|i| vec![format!("row {i}")]).collect();
    let handle = MemoryGrid::new(CellGrid::from_data(rows).unwrap());
    let converter = CaseConverter::new(CaseMode::Upper);

    let mut updates: Vec<ProgressUpdate> = Vec::new();
    let options = ChunkOptions::new()
        .with_chunk_rows(10)
        .on_progress(|update| updates.push(*update));
    let result = convert_case(&handle, &converter, options).await.unwrap();

    assert_eq!(result.changed_cells, 25);
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[2].processed_rows, 25);
    assert_eq!(updates[2].percent_complete, 100);
    assert_eq!(
        values(&handle).await.get(24, 0).unwrap(),
        &CellValue::text("ROW 24")
    );
}

#[tokio::test]
async fn test_find_replace_counts_cells_and_matches() {
    let handle = handle_of(vec![vec!["a-b-c", "none"], vec!["x-y", "-"]]);
    let replacer = Replacer::new("-", "+", ReplaceOptions::default()).unwrap();

    let summary = find_replace(&handle, &replacer, ChunkOptions::new().with_chunk_rows(1))
        .await
        .unwrap();

    assert_eq!(summary.cells_affected, 3);
    assert_eq!(summary.replacements, 4);
    assert_eq!(summary.processed_rows, 2);
    assert_eq!(
        values(&handle).await,
        CellGrid::from_data(vec![vec!["a+b+c", "none"], vec!["x+y", "+"]]).unwrap()
    );
}

#[test]
fn test_find_replace_rejects_bad_input() {
    assert!(matches!(
        Replacer::new("", "x", ReplaceOptions::default()),
        Err(ReplaceError::EmptyFind)
    ));
    let regex = ReplaceOptions {
        use_regex: true,
        ..ReplaceOptions::default()
    };
    let err: CleanError = Replacer::new("(unclosed", "x", regex).unwrap_err().into();
    assert!(matches!(err, CleanError::Replace(ReplaceError::InvalidRegex(_))));
}

#[tokio::test]
async fn test_fix_numbers() {
    let handle = handle_of(vec![vec![" 1,250 ", "12abc", "-3.5"]]);
    let result = fix_numbers(&handle, ChunkOptions::new()).await.unwrap();

    assert_eq!(result.changed_cells, 2);
    let grid = values(&handle).await;
    assert_eq!(grid.get(0, 0).unwrap(), &CellValue::Number(1250.0));
    assert_eq!(grid.get(0, 1).unwrap(), &CellValue::text("12abc"));
    assert_eq!(grid.get(0, 2).unwrap(), &CellValue::Number(-3.5));
}

#[tokio::test]
async fn test_detection_is_read_only_and_chunk_independent() {
    let handle = handle_of(vec![
        vec!["15.01.2023", "2023-01-15"],
        vec!["16.01.2023", "hello"],
        vec!["2023-01-17", "17.01.2023"],
    ]);
    let before = values(&handle).await;

    let chunked = detect_date_pattern(&handle, ChunkOptions::new().with_chunk_rows(1))
        .await
        .unwrap();
    let whole = detect_date_pattern(&handle, ChunkOptions::new()).await.unwrap();

    assert_eq!(chunked.dominant(), Some(PatternId::Eu));
    assert_eq!(chunked.count(PatternId::Eu), 3);
    assert_eq!(chunked.count(PatternId::Iso), 2);
    assert_eq!(chunked.dominant(), whole.dominant());
    assert_eq!(values(&handle).await, before);
}

#[tokio::test]
async fn test_standardize_to_detected_layout() {
    let handle = handle_of(vec![
        vec!["2023-01-15"],
        vec!["2023-02-20"],
        vec!["03/05/2023"],
        vec!["note"],
    ]);
    let outcome = standardize_dates(
        &handle,
        &DateFormatSettings::default(),
        ChunkOptions::new().with_chunk_rows(2),
    )
    .await
    .unwrap();

    assert_eq!(outcome.detected, Some(PatternId::Iso));
    assert_eq!(outcome.target, OutputPattern::Iso);
    assert_eq!(outcome.result.changed_cells, 1);
    assert_eq!(
        values(&handle).await,
        CellGrid::from_data(vec![
            vec!["2023-01-15"],
            vec!["2023-02-20"],
            vec!["2023-03-05"],
            vec!["note"],
        ])
        .unwrap()
    );
}

#[tokio::test]
async fn test_standardize_to_preferred_layout_keeps_time() {
    let handle = MemoryGrid::new(
        CellGrid::from_rows(vec![vec![
            CellValue::text("2023-01-15"),
            CellValue::text("2023-01-15T10:30:00Z"),
            CellValue::Number(44941.0),
        ]])
        .unwrap(),
    );
    let settings = DateFormatSettings {
        preferred_format: OutputPattern::DayMonthNameYear,
        detect_existing: false,
        preserve_time_components: true,
    };

    let outcome = standardize_dates(&handle, &settings, ChunkOptions::new())
        .await
        .unwrap();

    assert_eq!(outcome.detected, None);
    assert_eq!(outcome.result.changed_cells, 3);
    assert_eq!(
        values(&handle).await,
        CellGrid::from_data(vec![vec![
            "15-Jan-2023",
            "15-Jan-2023 10:30:00",
            "15-Jan-2023"
        ]])
        .unwrap()
    );
}

#[tokio::test]
async fn test_remove_duplicates_keeps_shape() {
    let handle = handle_of(vec![vec!["a", "1"], vec!["b", "2"], vec!["a", "1"]]);
    assert_eq!(remove_duplicates(&handle).await.unwrap(), 1);

    let grid = values(&handle).await;
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.get(1, 0).unwrap(), &CellValue::text("b"));
    assert_eq!(grid.get(2, 0).unwrap(), &CellValue::Empty);
    assert_eq!(remove_duplicates(&handle).await.unwrap(), 0);
}

#[tokio::test]
async fn test_one_click_cleanup() {
    let handle = handle_of(vec![
        vec!["  alice  ", "1,200"],
        vec!["  alice  ", "1,200"],
        vec!["BOB", "x"],
    ]);
    let report = one_click_cleanup(
        &handle,
        &CleanupOperation::ALL,
        &Settings::default(),
        ChunkOptions::new().with_chunk_rows(2),
    )
    .await
    .unwrap();

    assert_eq!(report.trimmed_cells, 2);
    assert_eq!(report.case_fixed_cells, 4);
    assert_eq!(report.number_fixed_cells, 2);
    assert_eq!(report.duplicates_removed, 1);
    assert!(report.summary().contains("Removed 1 duplicate rows"));

    let grid = values(&handle).await;
    assert_eq!(grid.get(0, 0).unwrap(), &CellValue::text("Alice"));
    assert_eq!(grid.get(0, 1).unwrap(), &CellValue::Number(1200.0));
    assert_eq!(grid.get(1, 0).unwrap(), &CellValue::text("Bob"));
    assert_eq!(grid.get(1, 1).unwrap(), &CellValue::text("X"));
    assert_eq!(grid.get(2, 0).unwrap(), &CellValue::Empty);
}

#[tokio::test]
async fn test_one_click_cleanup_on_clean_data() {
    let handle = handle_of(vec![vec!["Alice"], vec!["Bob"]]);
    let report = one_click_cleanup(
        &handle,
        &[CleanupOperation::Spaces, CleanupOperation::Duplicates],
        &Settings::default(),
        ChunkOptions::new(),
    )
    .await
    .unwrap();

    assert!(report.is_empty());
    assert_eq!(
        report.summary(),
        "No changes were needed in the selected range."
    );
}

#[tokio::test]
async fn test_undo_restores_previous_values() {
    let handle = handle_of(vec![vec!["  padded  "], vec!["ok"]]);
    let original = values(&handle).await;

    let mut undo = UndoStack::new();
    undo.record("trim", &handle).await.unwrap();
    trim_spaces(&handle, TrimOptions::default(), ChunkOptions::new())
        .await
        .unwrap();
    assert_ne!(values(&handle).await, original);

    assert_eq!(undo.undo(&handle).await.unwrap(), "trim");
    assert_eq!(values(&handle).await, original);
    assert!(matches!(
        undo.undo(&handle).await,
        Err(CleanError::NothingToUndo)
    ));
}
