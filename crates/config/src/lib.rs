// Configuration loading

pub mod settings;

pub use settings::{ClassificationSettings, ConfigError, OutputSettings, Settings};
