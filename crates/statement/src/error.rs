use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StatementError {
    /// A file could not be decoded as a spreadsheet.
    Unreadable { file_name: String, cause: String },
    /// No file in the batch produced a single record.
    NoValidData,
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { file_name, cause } => {
                write!(f, "error reading {file_name}: {cause}")
            }
            Self::NoValidData => {
                write!(f, "no valid data could be read; check that the spreadsheets are correct")
            }
        }
    }
}

impl std::error::Error for StatementError {}
