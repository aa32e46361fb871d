//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success (some input files may still have been skipped) |
//! | 1    | General error (unspecified)                           |
//! | 2    | Usage error (bad args, missing file)                  |
//! | 3    | IO error (settings, output file)                      |
//! | 5    | Export failed                                         |
//! | 6    | No valid data in any input file                       |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Settings or output file could not be read/written.
pub const EXIT_IO: u8 = 3;

/// The consolidated table could not be serialized.
pub const EXIT_EXPORT: u8 = 5;

/// Every input file was unreadable, too short, or had no dated rows.
pub const EXIT_NO_VALID_DATA: u8 = 6;
