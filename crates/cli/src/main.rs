//! # cellscrub-cli
//!
//! Command-line interface for cleaning spreadsheet data stored as CSV.

use anyhow::{bail, Context, Result};
use cellscrub_clean::ops;
use cellscrub_clean::{
    CaseConverter, CaseMode, CleanupOperation, Preview, RangeSummary, Replacer, SettingsStore,
    MAX_RECENT_ITEMS,
};
use cellscrub_dates::{OutputPattern, DEFAULT_PATTERN};
use cellscrub_pipeline::{ChunkOptions, MemoryGrid, ProgressUpdate, DEFAULT_CHUNK_ROWS};
use cellscrub_sheet::{CellGrid, CsvOptions};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// cellscrub - clean up spreadsheet data
#[derive(Parser, Debug)]
#[command(name = "cellscrub")]
#[command(author, version, about = "Clean up spreadsheet data in CSV files", long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Input, output and chunking shared by every data command.
#[derive(Args, Debug)]
struct DataArgs {
    /// Input CSV file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output CSV file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Rows processed per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_ROWS)]
    chunk_rows: usize,

    /// Show the first rows before and after, write nothing
    #[arg(long)]
    preview: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trim and collapse whitespace
    Trim {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Change text case (UPPER, LOWER, PROPER, SENTENCE, SMART)
    Case {
        #[command(flatten)]
        data: DataArgs,

        #[arg(value_name = "MODE")]
        mode: Option<CaseMode>,
    },

    /// Find and replace text
    Replace {
        #[command(flatten)]
        data: DataArgs,

        find: String,

        replacement: String,

        /// Treat FIND as a regular expression
        #[arg(long)]
        regex: bool,

        #[arg(long)]
        match_case: bool,

        /// Only match whole cells
        #[arg(long)]
        whole_cell: bool,
    },

    /// Remove duplicate rows
    Dedupe {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Rewrite dates in one layout
    Dates {
        #[command(flatten)]
        data: DataArgs,

        /// Target layout, e.g. YYYY-MM-DD or iso
        #[arg(long, value_name = "PATTERN")]
        format: Option<OutputPattern>,

        /// Use the target layout even if the data mostly uses another one
        #[arg(long)]
        no_detect: bool,
    },

    /// Report the date layouts found
    Detect {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(long, default_value_t = DEFAULT_CHUNK_ROWS)]
        chunk_rows: usize,
    },

    /// Run the one-click cleanup
    Cleanup {
        #[command(flatten)]
        data: DataArgs,

        /// Comma-separated steps: duplicates, spaces, case, formatting
        #[arg(long, value_name = "LIST", value_delimiter = ',')]
        ops: Option<Vec<CleanupOperation>>,
    },

    /// Count cells by type
    Summary {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print a setting, e.g. `trimSpaces.trimLeft`
    Get { path: String },

    /// Change a setting; VALUE is JSON, or plain text for strings
    Set { path: String, value: String },

    /// Restore defaults, for one category or everything
    Reset { category: Option<String> },

    /// Print the settings file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let path = cli.settings.unwrap_or_else(SettingsStore::default_path);
    let mut store = SettingsStore::load(path);
    run(cli.command, &mut store).await
}

async fn run(command: Command, store: &mut SettingsStore) -> Result<()> {
    match command {
        Command::Trim { data } => {
            let job = Job::load(&data)?;
            let options = store.settings().trim_spaces;
            let result = ops::trim_spaces(&job.handle, options, chunk_options(&data)).await?;
            job.finish(&data, store, format!("Trimmed spaces in {} cells", result.changed_cells))
                .await
        }
        Command::Case { data, mode } => {
            let job = Job::load(&data)?;
            let converter = CaseConverter::from_settings(&store.settings().case_conversion, mode);
            let result = ops::convert_case(&job.handle, &converter, chunk_options(&data)).await?;
            let message = format!(
                "Converted {} cells to {} case",
                result.changed_cells,
                converter.mode()
            );
            job.finish(&data, store, message).await
        }
        Command::Replace {
            data,
            find,
            replacement,
            regex,
            match_case,
            whole_cell,
        } => {
            let mut options = store.settings().find_replace.options();
            options.use_regex |= regex;
            options.match_case |= match_case;
            options.whole_cell |= whole_cell;
            let replacer = Replacer::new(&find, &replacement, options)?;

            let job = Job::load(&data)?;
            let summary = ops::find_replace(&job.handle, &replacer, chunk_options(&data)).await?;
            let message = format!(
                "Made {} replacements in {} cells",
                summary.replacements, summary.cells_affected
            );
            job.finish(&data, store, message).await?;

            if !data.preview {
                store
                    .add_recent_item("findReplace", "recentSearches", find, MAX_RECENT_ITEMS)
                    .context("Failed to save recent searches")?;
            }
            Ok(())
        }
        Command::Dedupe { data } => {
            let job = Job::load(&data)?;
            let removed = ops::remove_duplicates(&job.handle).await?;
            job.finish(&data, store, format!("Removed {removed} duplicate rows"))
                .await
        }
        Command::Dates {
            data,
            format,
            no_detect,
        } => {
            let mut settings = store.settings().date_format.clone();
            if let Some(format) = format {
                settings.preferred_format = format;
            }
            if no_detect {
                settings.detect_existing = false;
            }

            let job = Job::load(&data)?;
            let outcome = ops::standardize_dates(&job.handle, &settings, chunk_options(&data)).await?;
            let message = format!(
                "Standardized {} dates to {}",
                outcome.result.changed_cells,
                outcome.target.token()
            );
            job.finish(&data, store, message).await
        }
        Command::Detect { input, chunk_rows } => {
            let handle = MemoryGrid::new(load_typed_grid(&input)?);
            let options = ChunkOptions::new()
                .with_chunk_rows(chunk_rows)
                .on_progress(log_progress);
            let tally = ops::detect_date_pattern(&handle, options).await?;
            if tally.total() == 0 {
                println!(
                    "No dates found; defaulting to {}",
                    DEFAULT_PATTERN.display_name().bold()
                );
                return Ok(());
            }
            for (pattern, count) in tally.iter() {
                println!("{:<24} {count}", pattern.display_name());
            }
            if let Some(dominant) = tally.dominant() {
                println!("{} {}", "Dominant:".green().bold(), dominant.display_name());
            }
            Ok(())
        }
        Command::Cleanup { data, ops: steps } => {
            let operations = steps
                .unwrap_or_else(|| store.settings().one_click_cleanup.enabled_operations.clone());
            let job = Job::load(&data)?;
            let report = ops::one_click_cleanup(
                &job.handle,
                &operations,
                store.settings(),
                chunk_options(&data),
            )
            .await?;
            job.finish(&data, store, report.summary()).await
        }
        Command::Summary { input } => {
            let summary = RangeSummary::of(&load_typed_grid(&input)?);
            print_summary(&summary);
            Ok(())
        }
        Command::Settings { action } => run_settings(action, store),
    }
}

/// A loaded input file and the handle operations run against.
struct Job {
    original: CellGrid,
    handle: MemoryGrid,
}

impl Job {
    fn load(data: &DataArgs) -> Result<Self> {
        let original = load_grid(&data.input)?;
        let handle = MemoryGrid::new(original.clone());
        Ok(Self { original, handle })
    }

    /// Write the result, or print a preview of it, then report `message`.
    async fn finish(self, data: &DataArgs, store: &SettingsStore, message: String) -> Result<()> {
        let cleaned = self.handle.into_grid().await;

        if data.preview {
            let settings = &store.settings().preview;
            let preview = Preview::compare(
                &self.original,
                &cleaned,
                settings.preview_rows,
                settings.preview_columns,
            );
            print_preview(&preview);
        } else {
            write_output(&cleaned, data.output.as_deref())?;
        }

        if store.settings().show_notifications {
            eprintln!("{} {message}", "✓".green().bold());
        }
        Ok(())
    }
}

fn chunk_options(data: &DataArgs) -> ChunkOptions<'static> {
    ChunkOptions::new()
        .with_chunk_rows(data.chunk_rows)
        .on_progress(log_progress)
}

fn log_progress(update: &ProgressUpdate) {
    info!(
        processed = update.processed_rows,
        total = update.total_rows,
        percent = update.percent_complete,
        changed = update.changed_cells,
        "progress"
    );
}

/// Fields are kept as text so cells an operation leaves alone are written
/// back byte for byte.
fn raw_csv() -> CsvOptions {
    CsvOptions::default().with_type_inference(false)
}

fn load_grid(path: &Path) -> Result<CellGrid> {
    read_csv(path, raw_csv())
}

/// Numbers and booleans inferred; only for commands that never write back.
fn load_typed_grid(path: &Path) -> Result<CellGrid> {
    read_csv(path, CsvOptions::default())
}

fn read_csv(path: &Path, options: CsvOptions) -> Result<CellGrid> {
    CellGrid::from_csv_path(path, options)
        .with_context(|| format!("Failed to read CSV: {}", path.display()))
}

fn write_output(grid: &CellGrid, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => grid
            .save_csv(path, raw_csv())
            .with_context(|| format!("Failed to write CSV: {}", path.display())),
        None => grid
            .write_csv(std::io::stdout().lock(), raw_csv())
            .context("Failed to write CSV to stdout"),
    }
}

fn run_settings(action: SettingsAction, store: &mut SettingsStore) -> Result<()> {
    match action {
        SettingsAction::Get { path } => {
            let Some(value) = store.get(&path) else {
                bail!("Unknown setting: {path}");
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        SettingsAction::Set { path, value } => {
            store
                .update(&path, parse_setting_value(&value))
                .with_context(|| format!("Failed to update setting '{path}'"))?;
            println!("{} {path}", "Updated".green());
        }
        SettingsAction::Reset { category } => {
            let reset = match &category {
                Some(category) => store.reset_category(category),
                None => store.reset(),
            };
            reset.context("Failed to reset settings")?;
            println!(
                "{} {}",
                "Reset".green(),
                category.as_deref().unwrap_or("all settings")
            );
        }
        SettingsAction::Path => println!("{}", store.path().display()),
    }
    Ok(())
}

/// Values are JSON when they parse as JSON, plain strings otherwise.
fn parse_setting_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn format_rows(grid: &CellGrid) -> Vec<String> {
    grid.rows()
        .map(|row| {
            row.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect()
}

fn print_preview(preview: &Preview) {
    println!("{}", "Before:".cyan().bold());
    for line in format_rows(&preview.before) {
        println!("  {line}");
    }
    println!("{}", "After:".cyan().bold());
    for line in format_rows(&preview.after) {
        println!("  {line}");
    }
    println!(
        "{} changed cells shown, about {} in all {} rows x {} columns",
        preview.changed_cells, preview.estimated_changes, preview.total_rows, preview.total_columns
    );
    if preview.has_more_data {
        println!("{}", "(more data not shown)".dimmed());
    }
}

fn print_summary(summary: &RangeSummary) {
    let lines = [
        ("Total cells", summary.total_cells),
        ("Text", summary.text_cells),
        ("Numbers", summary.number_cells),
        ("Booleans", summary.bool_cells),
        ("Dates", summary.date_cells),
        ("Empty", summary.empty_cells),
        ("Duplicate values", summary.duplicates),
    ];
    for (label, count) in lines {
        println!("{:<18} {count}", format!("{label}:").bold());
    }
}
