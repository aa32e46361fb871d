// Excel statement import (xlsx, xls, xlsb, ods) and consolidated export (xlsx only)
//
// Import: first sheet only, decoded positionally. The used range is re-anchored
//         at A1 so fixed column/row indices line up with the physical sheet.
// Export: single sheet, header row + one row per record, no index column.

use std::io::Cursor;
use std::time::Instant;

use brb_statement::cell::date_to_serial;
use brb_statement::{CellValue, Column, ConsolidatedTable, RawRow, RawSheet, SheetSource};
use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Reader, Sheets};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};

/// Last row index Excel can hold (1,048,576 rows)
const MAX_XLSX_ROW: usize = 1_048_575;

/// Decode the first sheet of a spreadsheet byte stream.
pub fn read_sheet(bytes: &[u8]) -> Result<RawSheet, String> {
    let start_time = Instant::now();

    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| format!("Failed to open spreadsheet: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| "Spreadsheet contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first, e))?;

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<RawRow> = (0..start_row).map(|_| RawRow::default()).collect();
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(convert_cell));
        rows.push(RawRow::new(cells));
    }

    log::debug!(
        "decoded sheet '{}': {} rows in {} ms",
        first,
        rows.len(),
        start_time.elapsed().as_millis()
    );
    Ok(RawSheet::new(rows))
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(serial_1900(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// Date serial rebased on the 1900 system, so 1904-system workbooks keep
/// their calendar dates. Durations keep their raw value.
fn serial_1900(dt: &ExcelDateTime) -> f64 {
    let raw = dt.as_f64();
    if !dt.is_datetime() || !raw.is_finite() || raw < 0.0 {
        return raw;
    }
    let (year, month, day, ..) = dt.to_ymd_hms_milli();
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .and_then(date_to_serial)
        .map(|days| days + raw.fract())
        .unwrap_or(raw)
}

/// [`SheetSource`] backed by calamine's format auto-detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSource;

impl SheetSource for XlsxSource {
    fn read(&self, bytes: &[u8], file_name: &str) -> Result<RawSheet, String> {
        log::debug!("reading {} ({} bytes)", file_name, bytes.len());
        read_sheet(bytes)
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub sheet_name: String,
    /// Number format applied to date cells
    pub date_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Consolidado".to_string(),
            date_format: "dd/mm/yyyy".to_string(),
        }
    }
}

/// Export the consolidated table to XLSX bytes.
///
/// Columns are written in schema order. Amounts and other numeric cells stay
/// numbers; date cells are numbers with `options.date_format`.
pub fn export(table: &ConsolidatedTable, options: &ExportOptions) -> Result<Vec<u8>, String> {
    if table.len() > MAX_XLSX_ROW {
        return Err(format!(
            "{} rows exceed the XLSX limit of {}",
            table.len(),
            MAX_XLSX_ROW
        ));
    }

    let mut xlsx_workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(&options.date_format);

    let worksheet = xlsx_workbook
        .add_worksheet()
        .set_name(&options.sheet_name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", options.sheet_name, e))?;

    for (col, column) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, column.header(), &header_format)
            .map_err(|e| format!("Failed to write header '{}': {}", column.header(), e))?;
    }

    for (idx, record) in table.rows().iter().enumerate() {
        let row32 = (idx + 1) as u32;
        for (col, column) in Column::ALL.iter().enumerate() {
            write_cell(worksheet, row32, col as u16, &record.cell(*column), &date_format)?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("Failed to freeze header row: {}", e))?;

    xlsx_workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to save XLSX file: {}", e))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    date_format: &Format,
) -> Result<(), String> {
    let written = match value {
        CellValue::Empty => return Ok(()),
        CellValue::Text(s) | CellValue::Error(s) => worksheet.write_string(row, col, s),
        CellValue::Number(n) => worksheet.write_number(row, col, *n),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
        CellValue::DateTime(serial) => worksheet.write_number_with_format(row, col, *serial, date_format),
    };
    written
        .map(|_| ())
        .map_err(|e| format!("Failed to write cell ({}, {}): {}", row, col, e))
}
