pub mod builder;
pub mod cmake;
pub mod dry_run;
pub mod error;
pub mod exec;
pub mod git;
pub mod mock;
pub mod runner;


pub use builder::ProcessCommandBuilder;
pub use cmake::{CmakeRunner, CmakeRunnerImpl};
pub use dry_run::DryRunProcessRunner;
pub use error::ProcessError;
pub use exec::run_checked;
pub use git::{GitRunner, GitRunnerImpl};
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use runner::ProcessCommand;
pub use runner::{ExitStatus, ProcessRunner, ProcessStream};

use std::sync::Arc;

#[derive(Clone)]
pub struct SubprocessManager {
    runner: Arc<dyn ProcessRunner>,
}

impl SubprocessManager {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    pub fn production() -> Self {
        Self::new(Arc::new(runner::TokioProcessRunner))
    }

    pub fn dry_run() -> Self {
        Self::new(Arc::new(DryRunProcessRunner))
    }

    pub fn mock() -> (Self, MockProcessRunner) {
        let mock = MockProcessRunner::new();
        let runner = Arc::new(mock.clone()) as Arc<dyn ProcessRunner>;
        (Self::new(runner), mock)
    }

    pub fn runner(&self) -> Arc<dyn ProcessRunner> {
        Arc::clone(&self.runner)
    }

    pub fn git(&self) -> GitRunnerImpl {
        GitRunnerImpl::new(Arc::clone(&self.runner))
    }

    pub fn cmake(&self) -> CmakeRunnerImpl {
        CmakeRunnerImpl::new(Arc::clone(&self.runner))
    }
}
