// Application settings
// Loaded from ~/.config/brb-consolidador/settings.toml

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use brb_statement::classify::{AccountRule, RuleTable, UNCLASSIFIED_LABEL};
use brb_statement::table::DEFAULT_FILE_NAME;
use serde::{Deserialize, Serialize};

/// Excel rejects sheet names longer than this
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    Io(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// Settings parsed but are unusable.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "config IO error: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where and how the consolidated artifact is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub file_name: String,
    pub sheet_name: String,
    pub date_format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            sheet_name: "Consolidado".to_string(),
            date_format: "dd/mm/yyyy".to_string(),
        }
    }
}

/// File-name based account rules, consulted in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationSettings {
    pub unclassified_label: String,
    pub rules: Vec<AccountRule>,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        let table = RuleTable::default();
        Self {
            unclassified_label: UNCLASSIFIED_LABEL.to_string(),
            rules: table.rules().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output: OutputSettings,
    pub classification: ClassificationSettings,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("brb-consolidador");
        config_dir.join("settings.toml")
    }

    /// Load settings.
    ///
    /// An explicit path must exist and parse. Without one, the default file is
    /// used when present; a missing or broken default file means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        match Self::load_from(&path) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!("{} ({}); using default settings", e, path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("cannot read {}: {}", path.display(), e)))?;
        let settings = Self::from_toml(&contents)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.output.file_name.trim().is_empty() {
            return Err(ConfigError::Validation("output.file_name is empty".to_string()));
        }
        let sheet_len = self.output.sheet_name.chars().count();
        if sheet_len == 0 || sheet_len > MAX_SHEET_NAME_LEN {
            return Err(ConfigError::Validation(format!(
                "output.sheet_name must be 1-{} characters, got {}",
                MAX_SHEET_NAME_LEN, sheet_len
            )));
        }
        if let Some(pos) = self.classification.rules.iter().position(|r| r.pattern.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "classification.rules[{}] has an empty pattern",
                pos
            )));
        }
        Ok(())
    }

    /// Classification table for the extractor.
    pub fn rule_table(&self) -> RuleTable {
        RuleTable::new(
            self.classification.rules.clone(),
            self.classification.unclassified_label.clone(),
        )
    }

    /// Commented settings file equal to the defaults.
    pub fn default_toml() -> &'static str {
        r#"# BRB statement consolidation settings

[output]
# Suggested name of the consolidated workbook
file_name = "Consolidado_BRB_Final.xlsx"
sheet_name = "Consolidado"
# Number format for date cells
date_format = "dd/mm/yyyy"

[classification]
# Bank label for files whose name matches no rule (accounting code stays empty)
unclassified_label = "VERIFICAR_NOME_ARQUIVO"

# Rules are checked in order; the first pattern found in the file name wins.
# Matching is case-sensitive.
[[classification.rules]]
pattern = "422-6"
label = "422-6"
code = "3313"

[[classification.rules]]
pattern = "558-4"
label = "558-4"
code = "3314"
"#
    }

    /// Write the default settings file; never overwrites an existing one.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::Io(format!("{} already exists", path.display())));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        fs::write(path, Self::default_toml()).map_err(|e| ConfigError::Io(e.to_string()))
    }
}
