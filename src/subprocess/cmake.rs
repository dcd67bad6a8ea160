use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::builder::ProcessCommandBuilder;
use super::error::ProcessError;
use super::exec::run_checked;
use super::runner::ProcessRunner;

/// Configure and build steps of the native build toolchain
#[async_trait]
pub trait CmakeRunner: Send + Sync {
    async fn configure(
        &self,
        source: &Path,
        build_dir: &Path,
        options: &[String],
    ) -> Result<(), ProcessError>;
    async fn build(&self, build_dir: &Path, target: &str) -> Result<(), ProcessError>;
}

pub struct CmakeRunnerImpl {
    runner: Arc<dyn ProcessRunner>,
}

impl CmakeRunnerImpl {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl CmakeRunner for CmakeRunnerImpl {
    async fn configure(
        &self,
        source: &Path,
        build_dir: &Path,
        options: &[String],
    ) -> Result<(), ProcessError> {
        let command = ProcessCommandBuilder::new("cmake")
            .arg("-S")
            .path_arg(source)
            .arg("-B")
            .path_arg(build_dir)
            .args(options)
            .build();
        run_checked(self.runner.as_ref(), command).await
    }

    async fn build(&self, build_dir: &Path, target: &str) -> Result<(), ProcessError> {
        let command = ProcessCommandBuilder::new("cmake")
            .arg("--build")
            .path_arg(build_dir)
            .args(["--target", target, "--parallel"])
            .build();
        run_checked(self.runner.as_ref(), command).await
    }
}
