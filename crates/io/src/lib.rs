// Spreadsheet I/O for statement consolidation

pub mod csv;
pub mod xlsx;

pub use brb_statement::table::DEFAULT_FILE_NAME;
pub use xlsx::{export, read_sheet, ExportOptions, XlsxSource};

/// Content type of the XLSX artifact
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
