use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCode, PartexpError};

/// Problems found while reading or validating `Experiment.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Experiment configuration file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required key '{key}' in {context}")]
    MissingKey { key: String, context: String },

    #[error("Key '{key}' in {context} has the wrong type: expected {expected}, found {found}")]
    WrongType {
        key: String,
        context: String,
        expected: String,
        found: String,
    },

    #[error("Invalid value for key '{key}' in {context}: {reason}")]
    InvalidValue {
        key: String,
        context: String,
        reason: String,
    },

    #[error("Unknown {key} '{value}', expected one of: {expected}")]
    UnknownVariant {
        key: String,
        value: String,
        expected: String,
    },

    #[error("Unexpected configuration for {0}: expected a table")]
    NotATable(String),

    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },

    #[error(
        "Directory {} that stores the graphs of experiment '{experiment}' does not exist",
        .path.display()
    )]
    GraphsMissing { experiment: String, path: PathBuf },

    #[error(
        "Directory {} of experiment '{experiment}' does not contain any graphs",
        .path.display()
    )]
    GraphsEmpty { experiment: String, path: PathBuf },

    #[error("Failed to list graphs in {}: {source}", .path.display())]
    GraphsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Graphs {} and {} of experiment '{experiment}' share the name '{stem}' and would write the same log files",
        .first.display(),
        .second.display()
    )]
    DuplicateGraphStem {
        experiment: String,
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl ConfigError {
    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound(_) => ErrorCode::CONFIG_NOT_FOUND,
            Self::Read { .. } | Self::Parse(_) => ErrorCode::CONFIG_PARSE_ERROR,
            Self::MissingKey { .. } => ErrorCode::CONFIG_MISSING_REQUIRED,
            Self::WrongType { .. } | Self::NotATable(_) => ErrorCode::CONFIG_INVALID_TYPE,
            Self::InvalidValue { .. } | Self::InvalidName { .. } => ErrorCode::CONFIG_INVALID_VALUE,
            Self::UnknownVariant { .. } => ErrorCode::CONFIG_UNKNOWN_VARIANT,
            Self::GraphsMissing { .. } | Self::GraphsUnreadable { .. } => {
                ErrorCode::CONFIG_GRAPHS_MISSING
            }
            Self::GraphsEmpty { .. } => ErrorCode::CONFIG_GRAPHS_EMPTY,
            Self::DuplicateGraphStem { .. } => ErrorCode::CONFIG_GRAPHS_AMBIGUOUS,
        }
    }

    /// The configuration key at fault, when there is one
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key, .. }
            | Self::WrongType { key, .. }
            | Self::InvalidValue { key, .. }
            | Self::UnknownVariant { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<ConfigError> for PartexpError {
    fn from(err: ConfigError) -> Self {
        PartexpError::config_with_code(err.code(), err.to_string(), err.key().map(str::to_string))
    }
}
