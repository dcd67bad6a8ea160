use std::path::PathBuf;
use thiserror::Error;

pub mod codes;
pub mod helpers;

pub use codes::ErrorCode;
pub use helpers::ErrorExt;

/// The unified error type for the generator
#[derive(Error, Debug)]
pub enum PartexpError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        key: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Execution error: {message}")]
    Execution {
        code: u16,
        message: String,
        command: Option<String>,
        exit_code: Option<i32>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PartexpError {
    /// Create a configuration error with specific code and offending key
    pub fn config_with_code(code: u16, message: impl Into<String>, key: Option<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            key,
            source: None,
        }
    }

    /// Create a storage error with specific code and path
    pub fn storage_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an execution error with specific code
    pub fn execution_with_code(
        code: u16,
        message: impl Into<String>,
        command: Option<String>,
    ) -> Self {
        Self::Execution {
            code,
            message: message.into(),
            command,
            exit_code: None,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Execution { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Set the exit code for an execution error
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        if let Self::Execution {
            exit_code: ref mut ec,
            ..
        } = self
        {
            *ec = Some(exit_code);
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. } | Self::Storage { code, .. } | Self::Execution { code, .. } => {
                *code
            }
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, key, .. } => match key {
                Some(key) => format!("Configuration problem with key '{}': {}", key, message),
                None => format!("Configuration problem: {}", message),
            },
            Self::Storage { message, path, .. } => match path {
                Some(p) => format!("Storage error at {}: {}", p.display(), message),
                None => format!("Storage error: {}", message),
            },
            Self::Execution {
                message,
                command,
                exit_code,
                ..
            } => {
                let mut msg = match command {
                    Some(cmd) => format!("Command '{}' failed: {}", cmd, message),
                    None => format!("Execution error: {}", message),
                };
                if let Some(code) = exit_code {
                    msg.push_str(&format!(" (exit code {})", code));
                }
                msg
            }
        }
    }
}

/// Type alias for Results using PartexpError
pub type Result<T> = std::result::Result<T, PartexpError>;
