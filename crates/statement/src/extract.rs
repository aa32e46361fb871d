//! Record extraction from a raw BRB statement sheet.
//!
//! The export is semi-tabular: an 8-row header block, then one physical row
//! per transaction, except that a long supplier text wraps onto following rows
//! whose settlement-date cell is empty. The scan below is an explicit two-state
//! machine (`Idle` / `Open`). A record is finalized when the next dated row
//! opens a new one, or when the rows run out.

use serde::Serialize;

use crate::cell::{CellValue, RawRow, RawSheet};
use crate::classify::{Classification, RuleTable};

/// Rows before this index are the statement's header block.
pub const DATA_START_ROW: usize = 8;
/// Sheets shorter than this carry no data rows.
pub const MIN_ROWS: usize = DATA_START_ROW + 1;

pub const COL_SETTLEMENT_DATE: usize = 1;
pub const COL_ISSUE_DATE: usize = 2;
pub const COL_DOCUMENT: usize = 4;
pub const COL_NATURE: usize = 5;
pub const COL_NARRATIVE_1: usize = 9;
pub const COL_NARRATIVE_2: usize = 10;
pub const COL_RESPONSIBILITY_CENTER: usize = 12;
pub const COL_SUPPLIER: usize = 13;
pub const COL_DEBIT: usize = 18;

/// One logical transaction, possibly assembled from several physical rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub settlement_date: CellValue,
    pub issue_date: CellValue,
    /// Check or document number
    pub document: CellValue,
    pub nature: CellValue,
    /// Both narrative columns joined with a space and trimmed
    pub narrative: String,
    pub responsibility_center: CellValue,
    /// Supplier text including any continuation fragments
    pub supplier_raw: String,
    /// No source column funds credits; always zero at extraction time.
    pub credit: f64,
    pub debit: CellValue,
    pub bank_label: String,
    pub accounting_code: String,
    pub source_file: String,
}

enum ScanState {
    Idle,
    Open(TransactionRecord),
}

struct Scanner<'a> {
    file_name: &'a str,
    classification: Classification,
    state: ScanState,
    records: Vec<TransactionRecord>,
}

impl<'a> Scanner<'a> {
    fn new(file_name: &'a str, classification: Classification) -> Self {
        Self {
            file_name,
            classification,
            state: ScanState::Idle,
            records: Vec::new(),
        }
    }

    fn feed(&mut self, row: &RawRow) {
        if !row.get(COL_SETTLEMENT_DATE).is_blank() {
            let opened = self.open_record(row);
            if let ScanState::Open(done) = std::mem::replace(&mut self.state, ScanState::Open(opened)) {
                self.finalize(done);
            }
            return;
        }

        // Continuation row: only meaningful while a record is open
        if let ScanState::Open(record) = &mut self.state {
            let fragment = row.get(COL_SUPPLIER).to_text();
            let fragment = fragment.trim();
            if !fragment.is_empty() {
                record.supplier_raw.push(' ');
                record.supplier_raw.push_str(fragment);
            }
        }
    }

    fn open_record(&self, row: &RawRow) -> TransactionRecord {
        let narrative = format!(
            "{} {}",
            row.get(COL_NARRATIVE_1).to_text(),
            row.get(COL_NARRATIVE_2).to_text()
        );

        TransactionRecord {
            settlement_date: row.get(COL_SETTLEMENT_DATE).clone(),
            issue_date: row.get(COL_ISSUE_DATE).clone(),
            document: row.get(COL_DOCUMENT).clone(),
            nature: row.get(COL_NATURE).clone(),
            narrative: narrative.trim().to_string(),
            responsibility_center: row.get(COL_RESPONSIBILITY_CENTER).clone(),
            supplier_raw: row.get(COL_SUPPLIER).to_text(),
            credit: 0.0,
            debit: coerce_debit(row.get(COL_DEBIT)),
            bank_label: self.classification.label.clone(),
            accounting_code: self.classification.code.clone(),
            source_file: self.file_name.to_string(),
        }
    }

    fn finalize(&mut self, record: TransactionRecord) {
        log::trace!(
            "{}: record {} closed (supplier {:?})",
            self.file_name,
            self.records.len() + 1,
            record.supplier_raw
        );
        self.records.push(record);
    }

    fn finish(mut self) -> Vec<TransactionRecord> {
        if let ScanState::Open(done) = std::mem::replace(&mut self.state, ScanState::Idle) {
            self.finalize(done);
        }
        self.records
    }
}

/// Extract records using the default classification table.
pub fn extract(sheet: &RawSheet, file_name: &str) -> Vec<TransactionRecord> {
    extract_with_rules(sheet, file_name, &RuleTable::default())
}

/// Extract records, classifying the file with `rules`.
///
/// A sheet with fewer than [`MIN_ROWS`] rows yields no records; this is the
/// "no data" outcome, not an error.
pub fn extract_with_rules(sheet: &RawSheet, file_name: &str, rules: &RuleTable) -> Vec<TransactionRecord> {
    if sheet.len() < MIN_ROWS {
        log::debug!("{}: {} rows, below the {} needed for data", file_name, sheet.len(), MIN_ROWS);
        return Vec::new();
    }

    let classification = rules.classify(file_name);
    if classification.is_unclassified() {
        log::warn!("{}: file name matches no account rule, tagging as {}", file_name, classification.label);
    }

    let mut scanner = Scanner::new(file_name, classification);
    for row in &sheet.rows()[DATA_START_ROW..] {
        scanner.feed(row);
    }

    let records = scanner.finish();
    log::debug!("{}: {} records extracted", file_name, records.len());
    records
}

/// Debit defaults to zero when absent; anything else is kept as read.
fn coerce_debit(cell: &CellValue) -> CellValue {
    if cell.is_blank() {
        CellValue::Number(0.0)
    } else {
        cell.clone()
    }
}
