use crate::error::{ErrorCode, PartexpError};

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' exited with code {code}")]
    ExitCode { command: String, code: i32 },

    #[error("Command '{command}' terminated by signal {signal}")]
    Signal { command: String, signal: i32 },

    #[error("IO error while running '{command}': {source}")]
    IoError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },

    #[error("Mock expectation not met: {0}")]
    MockExpectationNotMet(String),
}

/// Convert ProcessError to PartexpError
impl From<ProcessError> for PartexpError {
    fn from(err: ProcessError) -> Self {
        let (code, command, exit_code) = match &err {
            ProcessError::CommandNotFound(cmd) => {
                (ErrorCode::EXEC_COMMAND_NOT_FOUND, Some(cmd.clone()), None)
            }
            ProcessError::SpawnFailed { command, .. } => {
                (ErrorCode::EXEC_SPAWN_FAILED, Some(command.clone()), None)
            }
            ProcessError::ExitCode { command, code } => (
                ErrorCode::EXEC_SUBPROCESS_FAILED,
                Some(command.clone()),
                Some(*code),
            ),
            ProcessError::Signal { command, signal } => (
                ErrorCode::EXEC_SIGNAL_RECEIVED,
                Some(command.clone()),
                Some(*signal),
            ),
            ProcessError::IoError { command, .. } => {
                (ErrorCode::EXEC_OUTPUT_ERROR, Some(command.clone()), None)
            }
            ProcessError::InternalError { .. } | ProcessError::MockExpectationNotMet(_) => {
                (ErrorCode::EXEC_GENERIC, None, None)
            }
        };

        let mut error = PartexpError::execution_with_code(code, err.to_string(), command);
        if let Some(exit_code) = exit_code {
            error = error.with_exit_code(exit_code);
        }
        error.with_source(err)
    }
}
