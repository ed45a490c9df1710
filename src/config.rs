//! Analysis configuration file.
//!
//! A config file is YAML (JSON also parses, since YAML is a superset):
//!
//! ```yaml
//! exclude_patterns:
//!   - "src/generated/**"
//! include_private: false
//! jobs: 4
//! format: json
//! ```
//!
//! The camelCase keys of `.docgenrc` files (`excludePatterns`,
//! `includePrivate`) are accepted as aliases. Unknown keys are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::OutputFormat;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Glob patterns excluded in addition to the built-in defaults.
    #[serde(default, alias = "excludePatterns")]
    pub exclude_patterns: Vec<String>,
    /// Keep private functions, methods and properties in the output.
    #[serde(default, alias = "includePrivate")]
    pub include_private: bool,
    /// Maximum number of files extracted concurrently.
    #[serde(default)]
    pub jobs: Option<usize>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config from YAML text. An empty document is the default
    /// config.
    pub fn parse_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}
