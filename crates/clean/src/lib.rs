//! # cellscrub-clean
//!
//! Cleaning transforms for spreadsheet ranges and the operations that run
//! them through the chunked pipeline.
//!
//! The per-cell pieces ([`TrimOptions`], [`CaseConverter`], [`Replacer`],
//! [`DateStandardizer`], [`fix_number`]) are plain synchronous values built
//! from [`Settings`]; the [`ops`] module wires them to a
//! [`GridHandle`](cellscrub_pipeline::GridHandle).

pub mod case;
pub mod cleanup;
pub mod dates;
pub mod duplicates;
pub mod error;
pub mod numbers;
pub mod ops;
pub mod preview;
pub mod replace;
pub mod settings;
pub mod summary;
pub mod trim;
pub mod undo;

pub use case::{CaseConverter, CaseMode, CaseSettings, COMMON_ACRONYMS};
pub use cleanup::{CleanupOperation, CleanupPlan, CleanupReport, CleanupSettings};
pub use dates::{DateFormatSettings, DateStandardizer};
pub use duplicates::{count_duplicate_rows, remove_duplicate_rows};
pub use error::{CleanError, ReplaceError, Result, SettingsError};
pub use numbers::{fix_number, parse_plain_number};
pub use ops::{DateStandardization, ReplaceSummary};
pub use preview::{Preview, PreviewSettings};
pub use replace::{FindReplaceSettings, ReplaceOptions, Replacement, Replacer};
pub use settings::{Settings, SettingsStore, MAX_RECENT_ITEMS};
pub use summary::RangeSummary;
pub use trim::TrimOptions;
pub use undo::{UndoEntry, UndoStack, MAX_UNDO_STACK_SIZE};
