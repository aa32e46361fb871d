//! Consolidated output table.
//!
//! Every row is projected onto the same 13 named columns, in a fixed order.
//! A value a record does not carry (a missing tax id) is an `Empty` cell, so
//! every table has the same shape whatever the input files looked like.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::cell::CellValue;
use crate::error::StatementError;
use crate::extract::TransactionRecord;
use crate::split::split;

/// Suggested name for the consolidated artifact
pub const DEFAULT_FILE_NAME: &str = "Consolidado_BRB_Final.xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SettlementDate,
    IssueDate,
    Document,
    Nature,
    Narrative,
    ResponsibilityCenter,
    TaxId,
    Name,
    Credit,
    Debit,
    BankLabel,
    AccountingCode,
    SourceFile,
}

impl Column {
    /// Schema order of the consolidated table.
    pub const ALL: [Column; 13] = [
        Column::SettlementDate,
        Column::IssueDate,
        Column::Document,
        Column::Nature,
        Column::Narrative,
        Column::ResponsibilityCenter,
        Column::TaxId,
        Column::Name,
        Column::Credit,
        Column::Debit,
        Column::BankLabel,
        Column::AccountingCode,
        Column::SourceFile,
    ];

    /// Header text written to the exported sheet.
    pub fn header(&self) -> &'static str {
        match self {
            Column::SettlementDate => "Baixa",
            Column::IssueDate => "Emissao",
            Column::Document => "Cheq_Doc",
            Column::Nature => "Natureza",
            Column::Narrative => "Historico",
            Column::ResponsibilityCenter => "Centro_Responsabilidade",
            Column::TaxId => "CNPJ",
            Column::Name => "Nome",
            Column::Credit => "Credito",
            Column::Debit => "Debito",
            Column::BankLabel => "BANCO",
            Column::AccountingCode => "CODIGO_CONTABIL",
            Column::SourceFile => "Arquivo_Origem",
        }
    }

    pub fn is_amount(&self) -> bool {
        matches!(self, Column::Credit | Column::Debit)
    }
}

/// A transaction with its supplier text split into tax id and name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: TransactionRecord,
    pub tax_id: Option<String>,
    pub supplier_name: String,
}

impl EnrichedRecord {
    pub fn new(record: TransactionRecord) -> Self {
        let (tax_id, supplier_name) = split(&record.supplier_raw);
        Self {
            record,
            tax_id,
            supplier_name,
        }
    }

    pub fn cell(&self, column: Column) -> CellValue {
        let r = &self.record;
        match column {
            Column::SettlementDate => r.settlement_date.clone(),
            Column::IssueDate => r.issue_date.clone(),
            Column::Document => r.document.clone(),
            Column::Nature => r.nature.clone(),
            Column::Narrative => CellValue::Text(r.narrative.clone()),
            Column::ResponsibilityCenter => r.responsibility_center.clone(),
            Column::TaxId => match &self.tax_id {
                Some(id) => CellValue::Text(id.clone()),
                None => CellValue::Empty,
            },
            Column::Name => CellValue::Text(self.supplier_name.clone()),
            Column::Credit => CellValue::Number(r.credit),
            Column::Debit => r.debit.clone(),
            Column::BankLabel => CellValue::Text(r.bank_label.clone()),
            Column::AccountingCode => CellValue::Text(r.accounting_code.clone()),
            Column::SourceFile => CellValue::Text(r.source_file.clone()),
        }
    }

    /// All cells in schema order.
    pub fn cells(&self) -> Vec<CellValue> {
        Column::ALL.iter().map(|c| self.cell(*c)).collect()
    }
}

impl Serialize for EnrichedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Column::ALL.len()))?;
        for column in Column::ALL {
            map.serialize_entry(column.header(), &self.cell(column))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedTable {
    rows: Vec<EnrichedRecord>,
}

impl ConsolidatedTable {
    pub fn new(rows: Vec<EnrichedRecord>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> &'static [Column] {
        &Column::ALL
    }

    pub fn headers(&self) -> Vec<&'static str> {
        Column::ALL.iter().map(|c| c.header()).collect()
    }

    pub fn rows(&self) -> &[EnrichedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Concatenate per-file record sequences in (file, row) order and split
/// each supplier text.
///
/// Fails with [`StatementError::NoValidData`] when no file produced a record.
pub fn consolidate(per_file: Vec<Vec<TransactionRecord>>) -> Result<ConsolidatedTable, StatementError> {
    let rows: Vec<EnrichedRecord> = per_file
        .into_iter()
        .filter(|records| !records.is_empty())
        .flatten()
        .map(EnrichedRecord::new)
        .collect();

    if rows.is_empty() {
        return Err(StatementError::NoValidData);
    }

    log::info!("consolidated {} rows", rows.len());
    Ok(ConsolidatedTable::new(rows))
}
