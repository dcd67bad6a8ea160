use async_trait::async_trait;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessRunner, ProcessStream};

/// Runner that only logs what would have been executed
///
/// Used by `generate --dry-run` so that scripts can be produced without
/// touching the network or the build toolchain.
pub struct DryRunProcessRunner;

#[async_trait]
impl ProcessRunner for DryRunProcessRunner {
    async fn run_streaming(&self, command: ProcessCommand) -> Result<ProcessStream, ProcessError> {
        tracing::info!("Dry run, not executing: {}", command.display());
        Ok(ProcessStream::finished(ExitStatus::Success, "", ""))
    }
}
