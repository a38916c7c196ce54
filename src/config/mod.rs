use crate::logging::LoggingConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub metadata: MetadataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Compare only the overlapping region when sizes differ.
    pub overlap_only: bool,
    /// Highest difference score still reported as a match.
    pub max_difference: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Metadata tool executable, resolved through `PATH` when relative.
    pub tool: PathBuf,
    /// Directory for staged image files (None = system temp dir).
    pub temp_dir: Option<PathBuf>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            tool: PathBuf::from("exiftool"),
            temp_dir: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        if content.trim_start().starts_with('{') {
            serde_json::from_str(&content).context("Invalid JSON configuration")
        } else {
            toml::from_str(&content).context("Invalid TOML configuration")
        }
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.metadata.tool.as_os_str().is_empty() {
            errors.push("Metadata tool must not be empty".to_string());
        }

        if let Some(ref dir) = self.metadata.temp_dir {
            if !dir.is_dir() {
                errors.push(format!("Metadata temp_dir is not a directory: {}", dir.display()));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub fn load_config_or_default(config_path: Option<&Path>) -> Config {
    match config_path {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => {
                if let Err(errors) = config.validate() {
                    // Logging is configured from this file, so report on stderr.
                    eprintln!("Configuration validation errors:");
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    eprintln!("Using default configuration instead.");
                    Config::default()
                } else {
                    config
                }
            }
            Err(e) => {
                eprintln!("Failed to load config from '{}': {:#}", path.display(), e);
                eprintln!("Using default configuration.");
                Config::default()
            }
        },
        None => Config::default(),
    }
}
