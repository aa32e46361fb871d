// Integration tests for statement decoding and consolidated XLSX export.
// Run with: cargo test -p brb-io --test xlsx_tests

use std::io::Cursor;
use std::ops::ControlFlow;

use brb_io::{export, read_sheet, ExportOptions, XlsxSource};
use brb_statement::{run_batch, CellValue, ConsolidatedTable, InputFile, RuleTable};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};

/// One statement data row: (settlement serial or none, supplier text, debit).
type Line<'a> = (Option<f64>, &'a str, Option<f64>);

/// Build a workbook shaped like a BRB statement export: title and account
/// metadata in the first 8 rows, transactions from row 9.
fn statement_workbook(lines: &[Line]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date = Format::new().set_num_format("dd/mm/yyyy");
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, "BRB - Banco de Brasilia").unwrap();
    sheet.write_string(2, 0, "Extrato de conta").unwrap();
    sheet.write_string(7, 1, "Baixa").unwrap();
    sheet.write_string(7, 13, "Fornecedor").unwrap();

    for (i, (settlement, supplier, debit)) in lines.iter().enumerate() {
        let row = 8 + i as u32;
        if let Some(serial) = settlement {
            sheet.write_number_with_format(row, 1, *serial, &date).unwrap();
            sheet.write_number_with_format(row, 2, *serial - 2.0, &date).unwrap();
            sheet.write_number(row, 4, 100.0 + i as f64).unwrap();
            sheet.write_string(row, 5, "PAG").unwrap();
            sheet.write_string(row, 9, "PAGAMENTO").unwrap();
            sheet.write_string(row, 10, "NF 77").unwrap();
            sheet.write_string(row, 12, "CR-01").unwrap();
        }
        if !supplier.is_empty() {
            sheet.write_string(row, 13, *supplier).unwrap();
        }
        if let Some(d) = debit {
            sheet.write_number(row, 18, *d).unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

fn read_back(bytes: Vec<u8>) -> (Vec<String>, Vec<Vec<Data>>) {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    let names = workbook.sheet_names().to_vec();
    let range = workbook.worksheet_range(&names[0]).unwrap();
    let rows = range.rows().map(|r| r.to_vec()).collect();
    (names, rows)
}

fn consolidate_files(files: Vec<InputFile>) -> ConsolidatedTable {
    let report = run_batch(&files, &XlsxSource, &RuleTable::default(), |_| ControlFlow::Continue(()));
    report.consolidate().unwrap()
}

#[test]
fn read_anchors_used_range_at_a1() {
    let mut workbook = Workbook::new();
    workbook.add_worksheet().write_string(9, 3, "late start").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let sheet = read_sheet(&bytes).unwrap();
    assert_eq!(sheet.len(), 10);
    assert_eq!(sheet.rows()[9].get(3), &CellValue::text("late start"));
    assert!(sheet.rows()[0].get(0).is_blank());
}

#[test]
fn read_keeps_dates_and_numbers_typed() {
    let bytes = statement_workbook(&[(Some(45292.0), "ACME", Some(10.5))]);
    let sheet = read_sheet(&bytes).unwrap();
    let row = &sheet.rows()[8];

    assert_eq!(row.get(1).as_date(), chrono::NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(row.get(4), &CellValue::Number(100.0));
    assert_eq!(row.get(18), &CellValue::Number(10.5));
}

#[test]
fn statement_rows_are_repaired_and_split() {
    let bytes = statement_workbook(&[
        (Some(45292.0), "12.345.678/0001-99 ACME", Some(10.0)),
        (None, "COMERCIO LTDA", None),
        (Some(45293.0), "PADARIA CENTRAL", None),
    ]);
    let table = consolidate_files(vec![InputFile::new("Extrato 422-6.xlsx", bytes)]);

    assert_eq!(table.len(), 2);
    let first = &table.rows()[0];
    assert_eq!(first.record.supplier_raw, "12.345.678/0001-99 ACME COMERCIO LTDA");
    assert_eq!(first.tax_id.as_deref(), Some("12.345.678/0001-99"));
    assert_eq!(first.supplier_name, "ACME COMERCIO LTDA");
    assert_eq!(first.record.narrative, "PAGAMENTO NF 77");
    assert_eq!(first.record.bank_label, "422-6");

    let second = &table.rows()[1];
    assert_eq!(second.tax_id, None);
    assert_eq!(second.record.debit, CellValue::Number(0.0));
}

#[test]
fn two_files_concatenate_in_order() {
    let a = statement_workbook(&[
        (Some(45292.0), "A1", Some(1.0)),
        (Some(45293.0), "A2", Some(2.0)),
        (Some(45294.0), "A3", Some(3.0)),
    ]);
    let b = statement_workbook(&[
        (Some(45300.0), "B1", Some(1.0)),
        (None, "CONT", None),
        (Some(45301.0), "B2", Some(2.0)),
        (Some(45302.0), "B3", Some(3.0)),
        (Some(45303.0), "B4", Some(4.0)),
        (Some(45304.0), "B5", Some(5.0)),
    ]);
    let table = consolidate_files(vec![
        InputFile::new("422-6 jan.xlsx", a),
        InputFile::new("558-4 jan.xlsx", b),
    ]);

    assert_eq!(table.len(), 8);
    let names: Vec<&str> = table.rows().iter().map(|r| r.supplier_name.as_str()).collect();
    assert_eq!(names, vec!["A1", "A2", "A3", "B1 CONT", "B2", "B3", "B4", "B5"]);
    assert_eq!(table.rows()[3].record.accounting_code, "3314");
}

#[test]
fn corrupt_file_is_skipped_in_batch() {
    let good = statement_workbook(&[(Some(45292.0), "ACME", Some(1.0))]);
    let files = vec![
        InputFile::new("422-6 broken.xlsx", b"PK\x03\x04 truncated".to_vec()),
        InputFile::new("422-6 ok.xlsx", good),
    ];
    let report = run_batch(&files, &XlsxSource, &RuleTable::default(), |_| ControlFlow::Continue(()));

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].to_string().starts_with("error reading 422-6 broken.xlsx"));
    assert_eq!(report.consolidate().unwrap().len(), 1);
}

#[test]
fn export_empty_table_has_header_only() {
    let bytes = export(&ConsolidatedTable::default(), &ExportOptions::default()).unwrap();
    let (names, rows) = read_back(bytes);

    assert_eq!(names, vec!["Consolidado".to_string()]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 13);
    assert_eq!(rows[0][0], Data::String("Baixa".to_string()));
    assert_eq!(rows[0][12], Data::String("Arquivo_Origem".to_string()));
}

#[test]
fn export_keeps_amounts_numeric() {
    let bytes = statement_workbook(&[
        (Some(45292.0), "ACME", Some(150.25)),
        (Some(45293.0), "12.345.678/0001-99 BETA", None),
    ]);
    let table = consolidate_files(vec![InputFile::new("558-4.xlsx", bytes)]);

    let options = ExportOptions {
        sheet_name: "Consolidated".to_string(),
        ..ExportOptions::default()
    };
    let (names, rows) = read_back(export(&table, &options).unwrap());

    assert_eq!(names, vec!["Consolidated".to_string()]);
    assert_eq!(rows.len(), 3);

    // Credito, Debito
    assert_eq!(rows[1][8], Data::Float(0.0));
    assert_eq!(rows[1][9], Data::Float(150.25));
    assert_eq!(rows[2][9], Data::Float(0.0));

    // CNPJ is blank when the supplier text carries none
    assert_eq!(rows[1][6], Data::Empty);
    assert_eq!(rows[2][6], Data::String("12.345.678/0001-99".to_string()));
    assert_eq!(rows[2][7], Data::String("BETA".to_string()));

    // Baixa stays a date
    assert!(matches!(rows[1][0], Data::DateTime(_)));
    assert_eq!(rows[1][10], Data::String("558-4".to_string()));
}

#[test]
fn text_debits_are_exported_verbatim() {
    let mut workbook = Workbook::new();
    let date = Format::new().set_num_format("dd/mm/yyyy");
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "BRB - Banco de Brasilia").unwrap();
    for (i, debit) in ["1.234", "NaN", "inf"].iter().enumerate() {
        let row = 8 + i as u32;
        sheet.write_number_with_format(row, 1, 45292.0, &date).unwrap();
        sheet.write_string(row, 13, "ACME").unwrap();
        sheet.write_string(row, 18, *debit).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let table = consolidate_files(vec![InputFile::new("422-6.xlsx", bytes)]);
    let debits: Vec<&CellValue> = table.rows().iter().map(|r| &r.record.debit).collect();
    assert_eq!(
        debits,
        vec![&CellValue::text("1.234"), &CellValue::text("NaN"), &CellValue::text("inf")]
    );

    let (_, rows) = read_back(export(&table, &ExportOptions::default()).unwrap());
    assert_eq!(rows[1][9], Data::String("1.234".to_string()));
    assert_eq!(rows[2][9], Data::String("NaN".to_string()));
    assert_eq!(rows[3][9], Data::String("inf".to_string()));
}
