//! Batch driver: one pass over the uploaded files, in order.
//!
//! Files are independent. A file that cannot be decoded is recorded as a
//! failure and skipped; the rest of the batch still runs. After each file the
//! caller is told how far along the batch is and may stop it before the next
//! file starts.

use std::ops::ControlFlow;

use crate::cell::RawSheet;
use crate::classify::RuleTable;
use crate::error::StatementError;
use crate::extract::{extract_with_rules, TransactionRecord};
use crate::table::{consolidate, ConsolidatedTable};

/// Decodes a spreadsheet byte stream into a raw sheet.
pub trait SheetSource {
    fn read(&self, bytes: &[u8], file_name: &str) -> Result<RawSheet, String>;
}

/// A file as handed over by the caller: name plus raw bytes, or the reason
/// the bytes could not be obtained.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Result<Vec<u8>, String>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Ok(bytes),
        }
    }

    /// A file that could not be read at all; the batch reports it in order.
    pub fn unreadable(name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: Err(cause.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction of files done, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Records per processed file, in input order (empty for skipped files)
    pub per_file: Vec<(String, Vec<TransactionRecord>)>,
    pub failures: Vec<StatementError>,
    /// Set when the caller stopped the batch early
    pub cancelled: bool,
}

impl BatchReport {
    pub fn record_count(&self) -> usize {
        self.per_file.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn consolidate(self) -> Result<ConsolidatedTable, StatementError> {
        consolidate(self.per_file.into_iter().map(|(_, records)| records).collect())
    }
}

/// Run extraction over `files` in order.
pub fn run_batch<S, F>(files: &[InputFile], source: &S, rules: &RuleTable, mut on_progress: F) -> BatchReport
where
    S: SheetSource + ?Sized,
    F: FnMut(Progress) -> ControlFlow<()>,
{
    let mut report = BatchReport::default();
    let total = files.len();

    for (i, file) in files.iter().enumerate() {
        let decoded = match &file.bytes {
            Ok(bytes) => source.read(bytes, &file.name),
            Err(cause) => Err(cause.clone()),
        };
        match decoded {
            Ok(sheet) => {
                let records = extract_with_rules(&sheet, &file.name, rules);
                report.per_file.push((file.name.clone(), records));
            }
            Err(cause) => {
                log::warn!("skipping {}: {}", file.name, cause);
                report.per_file.push((file.name.clone(), Vec::new()));
                report.failures.push(StatementError::Unreadable {
                    file_name: file.name.clone(),
                    cause,
                });
            }
        }

        let progress = Progress { completed: i + 1, total };
        if on_progress(progress).is_break() && i + 1 < total {
            log::info!("batch stopped after {} of {} files", i + 1, total);
            report.cancelled = true;
            break;
        }
    }

    report
}
