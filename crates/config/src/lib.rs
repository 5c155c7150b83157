#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for autorecipe
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/autorecipe/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use autorecipe_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Interpreter used for `python -m setuptools_scm` and `python -m hatch`
    #[serde(default = "default_python")]
    pub python: String,
    /// Replace an existing recipe instead of moving it to `.bak`
    #[serde(default)]
    pub overwrite: bool,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            overwrite: false,
        }
    }
}

fn default_python() -> String {
    autorecipe_types::DEFAULT_PYTHON.to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::APP_DIR)
            .join(constants::CONFIG_FILE))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// A host without a config directory gets the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub fn load() -> Result<Self, Error> {
        let Ok(config_path) = Self::default_path() else {
            return Ok(Self::default());
        };

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load(),
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(python) = std::env::var(constants::ENV_PYTHON) {
            if python.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: constants::ENV_PYTHON.to_string(),
                    value: python,
                }
                .into());
            }
            self.general.python = python;
        }

        if let Ok(overwrite) = std::env::var(constants::ENV_OVERWRITE) {
            self.general.overwrite = match overwrite.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: constants::ENV_OVERWRITE.to_string(),
                        value: overwrite,
                    }
                    .into())
                }
            };
        }

        if let Ok(input) = std::env::var(constants::ENV_INPUT) {
            self.paths.input = Some(PathBuf::from(input));
        }

        if let Ok(output) = std::env::var(constants::ENV_OUTPUT) {
            self.paths.output = Some(PathBuf::from(output));
        }

        Ok(())
    }

    /// Get the input path (with default)
    #[must_use]
    pub fn input_path(&self) -> PathBuf {
        self.paths
            .input
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_INPUT))
    }

    /// Configured output path, if any
    ///
    /// `None` lets the project's own `[tool.conda.recipe.output]` table and
    /// then the built-in default decide.
    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        self.paths.output.as_deref()
    }
}
