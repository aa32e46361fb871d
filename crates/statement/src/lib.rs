//! `brb-statement`: BRB bank statement consolidation engine.
//!
//! Pure engine crate: receives decoded sheets, returns consolidated tables.
//! No file, spreadsheet-format or CLI dependencies; decoding is plugged in
//! through [`batch::SheetSource`].

pub mod batch;
pub mod cell;
pub mod classify;
pub mod error;
pub mod extract;
pub mod split;
pub mod table;

pub use batch::{run_batch, BatchReport, InputFile, Progress, SheetSource};
pub use cell::{CellValue, RawRow, RawSheet};
pub use classify::{AccountRule, Classification, RuleTable};
pub use error::StatementError;
pub use extract::{extract, TransactionRecord};
pub use split::split;
pub use table::{consolidate, Column, ConsolidatedTable, EnrichedRecord};
