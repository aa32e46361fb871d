//! `brbc inspect`: classification and extracted records of one statement file.

use std::fs;
use std::path::Path;

use brb_statement::extract::{extract_with_rules, MIN_ROWS};
use brb_statement::EnrichedRecord;
use serde::Serialize;

use crate::consolidate::display_name;
use crate::exit_codes::EXIT_ERROR;
use crate::{load_settings, util, CliError};

const INSPECT_COL_WIDTH: usize = 32;

#[derive(Serialize)]
struct Inspection<'a> {
    file: &'a str,
    bank: &'a str,
    code: &'a str,
    sheet_rows: usize,
    records: &'a [EnrichedRecord],
}

pub(crate) fn cmd_inspect(file: &Path, config: Option<&Path>, json: bool) -> Result<(), CliError> {
    let settings = load_settings(config)?;
    let rules = settings.rule_table();
    let name = display_name(file);

    let bytes = fs::read(file).map_err(|e| CliError::io(format!("error reading {}: {}", name, e)))?;
    let sheet = brb_io::read_sheet(&bytes).map_err(|e| CliError::io(format!("error reading {}: {}", name, e)))?;

    let classification = rules.classify(&name);
    let records: Vec<EnrichedRecord> = extract_with_rules(&sheet, &name, &rules)
        .into_iter()
        .map(EnrichedRecord::new)
        .collect();

    if json {
        let report = Inspection {
            file: &name,
            bank: &classification.label,
            code: &classification.code,
            sheet_rows: sheet.len(),
            records: &records,
        };
        let out = serde_json::to_string_pretty(&report).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    println!("file:     {}", name);
    println!("bank:     {}", classification.label);
    println!(
        "code:     {}",
        if classification.code.is_empty() { "-" } else { classification.code.as_str() }
    );
    println!("rows:     {}", sheet.len());
    println!("records:  {}", records.len());

    if sheet.len() < MIN_ROWS {
        eprintln!("note: fewer than {} rows, no statement data", MIN_ROWS);
        return Ok(());
    }
    if records.is_empty() {
        return Ok(());
    }

    println!();
    let headers: Vec<&str> = brb_statement::Column::ALL.iter().map(|c| c.header()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| r.cells().iter().map(|c| c.to_text()).collect())
        .collect();
    print!("{}", util::render_table(&headers, &rows, INSPECT_COL_WIDTH));
    Ok(())
}
