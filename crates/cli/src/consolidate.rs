//! `brbc consolidate`: read, extract, consolidate and export a batch.

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use brb_io::{ExportOptions, XlsxSource, XLSX_MIME};
use brb_statement::{run_batch, ConsolidatedTable, EnrichedRecord, InputFile, StatementError};
use serde::Serialize;

use crate::exit_codes::{EXIT_EXPORT, EXIT_NO_VALID_DATA};
use crate::{load_settings, util, CliError, OutputFormat};

/// Widest a preview column may get
const PREVIEW_COL_WIDTH: usize = 24;

pub(crate) struct ConsolidateArgs {
    pub files: Vec<PathBuf>,
    pub out: Option<PathBuf>,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
    pub preview: usize,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    rows: usize,
    output: String,
    content_type: &'static str,
    files: Vec<FileSummary>,
    failures: Vec<FailureSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<&'a [EnrichedRecord]>,
}

#[derive(Serialize)]
struct FileSummary {
    file: String,
    bank: String,
    code: String,
    records: usize,
}

#[derive(Serialize)]
struct FailureSummary {
    file: String,
    error: String,
}

pub(crate) fn cmd_consolidate(args: ConsolidateArgs) -> Result<(), CliError> {
    let settings = load_settings(args.config.as_deref())?;
    let rules = settings.rule_table();

    let inputs: Vec<InputFile> = args
        .files
        .iter()
        .map(|path| {
            let name = display_name(path);
            match fs::read(path) {
                Ok(bytes) => InputFile::new(name, bytes),
                Err(e) => InputFile::unreadable(name, e.to_string()),
            }
        })
        .collect();

    let report = run_batch(&inputs, &XlsxSource, &rules, |progress| {
        if !args.quiet {
            eprintln!(
                "[{}/{}] {} ({:.0}%)",
                progress.completed,
                progress.total,
                inputs[progress.completed - 1].name,
                progress.fraction() * 100.0
            );
        }
        ControlFlow::Continue(())
    });

    for failure in &report.failures {
        eprintln!("warning: {}", failure);
    }
    let failures = report.failures.clone();

    let files: Vec<FileSummary> = report
        .per_file
        .iter()
        .map(|(name, records)| {
            let c = rules.classify(name);
            FileSummary {
                file: name.clone(),
                bank: c.label,
                code: c.code,
                records: records.len(),
            }
        })
        .collect();

    let table = report.consolidate().map_err(|e| {
        CliError::new(EXIT_NO_VALID_DATA, e.to_string())
            .with_hint("statement data must start on row 9 of the first sheet")
    })?;

    let out = output_path(args.out, &settings.output.file_name, args.format);
    let bytes = match args.format {
        OutputFormat::Xlsx => {
            let options = ExportOptions {
                sheet_name: settings.output.sheet_name.clone(),
                date_format: settings.output.date_format.clone(),
            };
            brb_io::export(&table, &options)
        }
        OutputFormat::Csv => brb_io::csv::export(&table),
    }
    .map_err(|e| CliError::new(EXIT_EXPORT, e))?;

    fs::write(&out, &bytes).map_err(|e| CliError::io(format!("cannot write {}: {}", out.display(), e)))?;
    log::info!("wrote {} bytes to {}", bytes.len(), out.display());

    if !args.quiet {
        eprintln!("Success! {} rows generated.", table.len());
        eprintln!("wrote {}", out.display());
    }

    let preview = &table.rows()[..args.preview.min(table.len())];
    if args.json {
        let summary = Summary {
            rows: table.len(),
            output: out.display().to_string(),
            content_type: content_type(args.format),
            files,
            failures: failures
                .iter()
                .map(|f| match f {
                    StatementError::Unreadable { file_name, cause } => FailureSummary {
                        file: file_name.clone(),
                        error: cause.clone(),
                    },
                    other => FailureSummary {
                        file: String::new(),
                        error: other.to_string(),
                    },
                })
                .collect(),
            preview: (!preview.is_empty()).then_some(preview),
        };
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::new(crate::exit_codes::EXIT_ERROR, e.to_string()))?;
        println!("{}", json);
    } else if !preview.is_empty() {
        print!("{}", render_preview(&table, preview.len()));
    }

    Ok(())
}

/// File name as shown to the user and matched by the account rules.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn output_path(out: Option<PathBuf>, default_name: &str, format: OutputFormat) -> PathBuf {
    match out {
        Some(path) => path,
        None => {
            let path = PathBuf::from(default_name);
            match format {
                OutputFormat::Xlsx => path,
                OutputFormat::Csv => path.with_extension("csv"),
            }
        }
    }
}

fn content_type(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Xlsx => XLSX_MIME,
        OutputFormat::Csv => "text/csv",
    }
}

fn render_preview(table: &ConsolidatedTable, n: usize) -> String {
    let rows: Vec<Vec<String>> = table.rows()[..n]
        .iter()
        .map(|r| r.cells().iter().map(|c| c.to_text()).collect())
        .collect();
    util::render_table(&table.headers(), &rows, PREVIEW_COL_WIDTH)
}
