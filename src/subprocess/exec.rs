//! Checked execution of toolchain commands with live output
//!
//! Every fetch and build step goes through [`run_checked`]: the command line is
//! echoed, stdout and stderr are interleaved line by line as they arrive, and a
//! non-zero exit becomes a [`ProcessError`]. Only the exit status decides
//! failure: a broken output pipe stops the echo but the child is still reaped.

use futures::stream::{self, StreamExt};
use tracing::warn;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessRunner, ProcessStream};

/// Run a command to completion, streaming its combined output, and fail on a non-zero exit
pub async fn run_checked(
    runner: &dyn ProcessRunner,
    command: ProcessCommand,
) -> Result<(), ProcessError> {
    let command_line = command.display();
    eprintln!("  $ {command_line}");

    let ProcessStream {
        stdout,
        stderr,
        status,
    } = runner.run_streaming(command).await?;

    let mut output = stream::select(stdout, stderr);
    while let Some(line) = output.next().await {
        match line {
            Ok(line) => eprintln!("  | {line}"),
            Err(e) => {
                warn!("Lost output of '{}': {}", command_line, e);
                break;
            }
        }
    }
    drop(output);

    let status = status.await?;
    check_status(&status, command_line)?;
    eprintln!("  `-- Exit code: 0");
    Ok(())
}

/// Translate an exit status into a Result
fn check_status(status: &ExitStatus, command: String) -> Result<(), ProcessError> {
    match status {
        ExitStatus::Success => Ok(()),
        ExitStatus::Error(code) => {
            eprintln!("  `-- Exit code: {code}");
            Err(ProcessError::ExitCode {
                command,
                code: *code,
            })
        }
        ExitStatus::Signal(signal) => Err(ProcessError::Signal {
            command,
            signal: *signal,
        }),
    }
}
