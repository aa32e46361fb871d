// brbc - consolidate BRB bank statement exports into one spreadsheet

mod consolidate;
mod exit_codes;
mod inspect;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use brb_config::Settings;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use exit_codes::{EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "brbc")]
#[command(about = "Consolidate BRB bank statement spreadsheets into a single workbook")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read statement files, repair supplier rows, split CNPJ/name and export one table
    #[command(after_help = "\
File names decide the bank account: they must contain 422-6 or 558-4.

Examples:
  brbc consolidate 'Extrato 422-6 jan.xlsx' 'Extrato 558-4 jan.xlsx'
  brbc consolidate *.xlsx --out consolidado.xlsx --preview 50
  brbc consolidate *.xls --format csv --out consolidado.csv")]
    Consolidate {
        /// Statement files (xlsx, xls, xlsb, ods)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (default: output.file_name from settings)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Xlsx)]
        format: OutputFormat,

        /// Settings file (default: user config directory)
        #[arg(long, env = "BRBC_CONFIG")]
        config: Option<PathBuf>,

        /// Print the first N consolidated rows to stdout
        #[arg(long, default_value_t = 0)]
        preview: usize,

        /// Print a JSON summary to stdout
        #[arg(long)]
        json: bool,

        /// Suppress progress and success messages on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Show the classification and extracted records of one statement file
    Inspect {
        file: PathBuf,

        /// Settings file (default: user config directory)
        #[arg(long, env = "BRBC_CONFIG")]
        config: Option<PathBuf>,

        /// Output records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the active file-name classification rules
    Rules {
        /// Settings file (default: user config directory)
        #[arg(long, env = "BRBC_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Settings file management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the default settings file location
    Path,
    /// Write a commented default settings file
    Init {
        /// Target path (default: user config directory)
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Consolidate {
            files,
            out,
            format,
            config,
            preview,
            json,
            quiet,
        } => consolidate::cmd_consolidate(consolidate::ConsolidateArgs {
            files,
            out,
            format,
            config,
            preview,
            json,
            quiet,
        }),
        Commands::Inspect { file, config, json } => inspect::cmd_inspect(&file, config.as_deref(), json),
        Commands::Rules { config } => cmd_rules(config),
        Commands::Config(ConfigCommands::Path) => {
            println!("{}", Settings::config_path().display());
            Ok(())
        }
        Commands::Config(ConfigCommands::Init { path }) => cmd_config_init(path),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<brb_config::ConfigError> for CliError {
    fn from(err: brb_config::ConfigError) -> Self {
        CliError::io(err.to_string()).with_hint(format!(
            "run `brbc config init` to write a fresh settings file ({})",
            Settings::config_path().display()
        ))
    }
}

/// Load settings, mapping failures to a CLI error.
pub(crate) fn load_settings(config: Option<&std::path::Path>) -> Result<Settings, CliError> {
    Ok(Settings::load(config)?)
}

fn cmd_rules(config: Option<PathBuf>) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let table = settings.rule_table();

    let mut rows: Vec<Vec<String>> = table
        .rules()
        .iter()
        .map(|r| vec![r.pattern.clone(), r.label.clone(), r.code.clone()])
        .collect();
    rows.push(vec!["(no match)".to_string(), table.unclassified_label().to_string(), String::new()]);

    print!("{}", util::render_table(&["PATTERN", "BANCO", "CODIGO_CONTABIL"], &rows, 40));
    Ok(())
}

fn cmd_config_init(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path.unwrap_or_else(Settings::config_path);
    Settings::write_default(&path).map_err(|e| CliError::io(e.to_string()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
