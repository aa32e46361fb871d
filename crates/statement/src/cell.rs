// Positional cell model for header-less statement sheets.
//
// Cells are addressed by fixed index only. A cell past the end of a row reads
// as `Empty`, so "missing" and "empty" are the same state, and both differ
// from a zero or from non-blank text.

use chrono::{Days, NaiveDate};
use serde::ser::{Serialize, Serializer};

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Date/time as a spreadsheet serial (1900 date system)
    DateTime(f64),
    /// Spreadsheet error literal such as `#N/A`
    Error(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// True for empty cells and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual rendering used wherever a cell is read as free text.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            CellValue::DateTime(serial) => match serial_to_date(*serial) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => format_number(*serial),
            },
            CellValue::Error(e) => e.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Calendar date for date cells. Time of day is dropped.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::DateTime(serial) => serial_to_date(*serial),
            _ => None,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(s) | CellValue::Error(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::DateTime(_) => serializer.serialize_str(&self.to_text()),
        }
    }
}

/// Integers without decimals, everything else as-is.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Convert a 1900-system serial to a date.
///
/// The 1900 system counts a phantom 1900-02-29 (serial 60), so serials from 61
/// onward are anchored one day earlier than those before it.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let days = serial.trunc() as u64;
    let epoch = if days >= 60 {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    };
    epoch.checked_add_days(Days::new(days))
}

/// Inverse of [`serial_to_date`]: whole-day serial of `date` in the 1900 system.
pub fn date_to_serial(date: NaiveDate) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = (date - epoch).num_days();
    match days {
        d if d < 2 => None,
        d if d <= 60 => Some((d - 1) as f64),
        d => Some(d as f64),
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// One physical row, addressed by column index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at `col`; columns past the end of the row read as `Empty`.
    pub fn get(&self, col: usize) -> &CellValue {
        self.cells.get(col).unwrap_or(&EMPTY)
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

impl From<Vec<CellValue>> for RawRow {
    fn from(cells: Vec<CellValue>) -> Self {
        Self::new(cells)
    }
}

/// A whole sheet; row 0 is the first physical row of the sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    rows: Vec<RawRow>,
}

impl RawSheet {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }
}

impl FromIterator<RawRow> for RawSheet {
    fn from_iter<I: IntoIterator<Item = RawRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
