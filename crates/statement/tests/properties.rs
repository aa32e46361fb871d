// Property tests for extraction invariants that hold for any sheet content.
// Run with: cargo test -p brb-statement --test properties

use brb_statement::extract::{extract, MIN_ROWS};
use brb_statement::{CellValue, RawRow, RawSheet};
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        "[A-Z ]{0,8}".prop_map(CellValue::Text),
        (-1e6f64..1e6).prop_map(CellValue::Number),
        (40000f64..47000.0).prop_map(CellValue::DateTime),
    ]
}

fn row() -> impl Strategy<Value = RawRow> {
    prop::collection::vec(cell(), 0..20).prop_map(RawRow::new)
}

fn file_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,6}".prop_map(|s| format!("{s}422-6.xlsx")),
        "[a-z ]{0,6}".prop_map(|s| format!("{s}558-4.xls")),
        "[a-z ]{0,10}".prop_map(|s| format!("{s}.xlsx")),
    ]
}

proptest! {
    #[test]
    fn short_sheets_yield_no_records(rows in prop::collection::vec(row(), 0..MIN_ROWS), name in file_name()) {
        let sheet = RawSheet::new(rows);
        prop_assert!(extract(&sheet, &name).is_empty());
    }

    #[test]
    fn one_record_per_dated_data_row(rows in prop::collection::vec(row(), MIN_ROWS..40), name in file_name()) {
        let sheet = RawSheet::new(rows);
        let dated = sheet.rows()[8..].iter().filter(|r| !r.get(1).is_blank()).count();
        prop_assert_eq!(extract(&sheet, &name).len(), dated);
    }

    #[test]
    fn labels_follow_file_name(rows in prop::collection::vec(row(), MIN_ROWS..20), name in file_name()) {
        let sheet = RawSheet::new(rows);
        let (label, code) = if name.contains("422-6") {
            ("422-6", "3313")
        } else if name.contains("558-4") {
            ("558-4", "3314")
        } else {
            ("VERIFICAR_NOME_ARQUIVO", "")
        };
        for record in extract(&sheet, &name) {
            prop_assert_eq!(record.bank_label.as_str(), label);
            prop_assert_eq!(record.accounting_code.as_str(), code);
            prop_assert_eq!(record.source_file.as_str(), name.as_str());
        }
    }
}
