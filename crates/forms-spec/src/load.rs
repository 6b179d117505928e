use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::spec::form::FormConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {0} not found")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse form configuration: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Read and parse the form configuration stored at `path`.
pub fn load_config(path: &Path) -> Result<FormConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_config(&contents)
}

/// Parse a configuration document held in memory.
pub fn parse_config(contents: &str) -> Result<FormConfig, ConfigError> {
    serde_json::from_str(contents).map_err(ConfigError::Parse)
}

/// Convert an already-parsed document into a configuration.
pub fn config_from_value(value: Value) -> Result<FormConfig, ConfigError> {
    serde_json::from_value(value).map_err(ConfigError::Parse)
}
