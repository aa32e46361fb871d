// CSV export of the consolidated table

use brb_statement::ConsolidatedTable;

/// Export the consolidated table as CSV: header row, then one line per record.
///
/// Cells are written with their text rendering (dates as `YYYY-MM-DD`).
pub fn export(table: &ConsolidatedTable) -> Result<Vec<u8>, String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(table.headers())
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for (idx, record) in table.rows().iter().enumerate() {
        let fields: Vec<String> = record.cells().iter().map(|c| c.to_text()).collect();
        writer
            .write_record(&fields)
            .map_err(|e| format!("Failed to write CSV row {}: {}", idx + 1, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| format!("Failed to flush CSV output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brb_statement::{CellValue, EnrichedRecord, TransactionRecord};

    #[test]
    fn test_export_header_only() {
        let bytes = export(&ConsolidatedTable::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Baixa,Emissao,Cheq_Doc,Natureza,Historico,Centro_Responsabilidade,CNPJ,Nome,Credito,Debito,BANCO,CODIGO_CONTABIL,Arquivo_Origem\n"
        );
    }

    #[test]
    fn test_export_quotes_and_numbers() {
        let record = TransactionRecord {
            settlement_date: CellValue::DateTime(45292.0),
            issue_date: CellValue::text("29/12/2023"),
            document: CellValue::Number(551.0),
            nature: CellValue::text("PAG"),
            narrative: "PAGTO, NF 10".to_string(),
            responsibility_center: CellValue::Empty,
            supplier_raw: "12.345.678/0001-99 ACME LTDA".to_string(),
            credit: 0.0,
            debit: CellValue::Number(1234.5),
            bank_label: "422-6".to_string(),
            accounting_code: "3313".to_string(),
            source_file: "422-6.xlsx".to_string(),
        };
        let table = ConsolidatedTable::new(vec![EnrichedRecord::new(record)]);
        let text = String::from_utf8(export(&table).unwrap()).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "2024-01-01,29/12/2023,551,PAG,\"PAGTO, NF 10\",,12.345.678/0001-99,ACME LTDA,0,1234.5,422-6,3313,422-6.xlsx"
        );
    }
}
