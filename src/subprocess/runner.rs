use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use std::process::Stdio;

use super::error::ProcessError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessCommand {
    /// Render the command as a shell line that could be pasted into a terminal
    pub fn display(&self) -> String {
        shell_words::join(
            std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }
}

pub type ProcessStreamItem = Result<String, ProcessError>;
pub type ProcessStreamFut = Pin<Box<dyn Stream<Item = ProcessStreamItem> + Send>>;
pub type ProcessStatusFut =
    Pin<Box<dyn futures::Future<Output = Result<ExitStatus, ProcessError>> + Send>>;

pub struct ProcessStream {
    pub stdout: ProcessStreamFut,
    pub stderr: ProcessStreamFut,
    pub status: ProcessStatusFut,
}

impl ProcessStream {
    /// A stream for a process that has already finished with canned output
    pub fn finished(status: ExitStatus, stdout: &str, stderr: &str) -> Self {
        fn lines(text: &str) -> ProcessStreamFut {
            let items: Vec<ProcessStreamItem> =
                text.lines().map(|line| Ok(line.to_string())).collect();
            Box::pin(futures::stream::iter(items))
        }

        Self {
            stdout: lines(stdout),
            stderr: lines(stderr),
            status: Box::pin(futures::future::ready(Ok(status))),
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run_streaming(&self, command: ProcessCommand) -> Result<ProcessStream, ProcessError>;
}

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Decode a raw line, dropping the trailing newline
    ///
    /// Output is opaque to us, so bytes that are not UTF-8 are replaced rather
    /// than rejected.
    fn normalize_line(mut line: Vec<u8>) -> String {
        if line.ends_with(b"\n") {
            line.pop();
            if line.ends_with(b"\r") {
                line.pop();
            }
        }
        String::from_utf8_lossy(&line).into_owned()
    }

    /// Create a line stream from a buffered reader; the stream ends after the first read error
    fn create_line_stream<R>(reader: tokio::io::BufReader<R>, command: String) -> ProcessStreamFut
    where
        R: tokio::io::AsyncRead + Send + Unpin + 'static,
    {
        use tokio::io::AsyncBufReadExt;

        Box::pin(futures::stream::unfold(
            Some((reader, command)),
            |state| async move {
                let Some((mut reader, command)) = state else {
                    return None;
                };
                let mut line = Vec::new();
                match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => None, // EOF
                    Ok(_) => {
                        let normalized = Self::normalize_line(line);
                        Some((Ok(normalized), Some((reader, command))))
                    }
                    Err(e) => Some((
                        Err(ProcessError::IoError {
                            command,
                            source: e,
                        }),
                        None,
                    )),
                }
            },
        )) as ProcessStreamFut
    }

    /// Convert a std ExitStatus to our ExitStatus enum
    fn convert_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    /// Parse signal status on Unix systems
    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    /// Create the future resolving to the exit status of the child
    fn create_status_future(mut child: tokio::process::Child, command: String) -> ProcessStatusFut {
        Box::pin(async move {
            match child.wait().await {
                Ok(status) => Ok(Self::convert_exit_status(status)),
                Err(e) => Err(ProcessError::IoError { command, source: e }),
            }
        })
    }

    /// Log command execution details
    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.display());
        tracing::trace!("Argument count: {}", command.args.len());
    }

    /// Configure the command with piped output streams
    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    /// Map spawn error to ProcessError
    fn map_spawn_error(error: std::io::Error, command: &ProcessCommand) -> ProcessError {
        if error.kind() == std::io::ErrorKind::NotFound {
            tracing::error!(
                "Command '{}' not found. Parent process PATH: {}",
                command.program,
                std::env::var("PATH").unwrap_or_default()
            );
            ProcessError::CommandNotFound(command.program.clone())
        } else {
            tracing::error!(
                "Failed to spawn '{}': {:?} (kind: {:?})",
                command.program,
                error,
                error.kind()
            );
            ProcessError::SpawnFailed {
                command: command.display(),
                source: error,
            }
        }
    }

    /// Extract a stream from a child process, converting None to error
    fn extract_stream<T>(stream: Option<T>, stream_name: &str) -> Result<T, ProcessError> {
        stream.ok_or_else(|| ProcessError::InternalError {
            message: format!("Failed to capture {}", stream_name),
        })
    }

    /// Extract and create output streams from a child process
    fn create_output_streams(
        child: &mut tokio::process::Child,
        command: &str,
    ) -> Result<(ProcessStreamFut, ProcessStreamFut), ProcessError> {
        use tokio::io::BufReader;

        let stdout = Self::extract_stream(child.stdout.take(), "stdout")?;
        let stderr = Self::extract_stream(child.stderr.take(), "stderr")?;

        let stdout_stream = Self::create_line_stream(BufReader::new(stdout), command.to_string());
        let stderr_stream = Self::create_line_stream(BufReader::new(stderr), command.to_string());

        Ok((stdout_stream, stderr_stream))
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run_streaming(&self, command: ProcessCommand) -> Result<ProcessStream, ProcessError> {
        Self::log_command_start(&command);

        let mut child = Self::configure_command(&command)
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command))?;

        let display = command.display();
        let (stdout_stream, stderr_stream) = Self::create_output_streams(&mut child, &display)?;
        let status_fut = Self::create_status_future(child, display);

        Ok(ProcessStream {
            stdout: stdout_stream,
            stderr: stderr_stream,
            status: status_fut,
        })
    }
}
