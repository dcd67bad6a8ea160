use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::builder::ProcessCommandBuilder;
use super::error::ProcessError;
use super::exec::run_checked;
use super::runner::ProcessRunner;

/// The subset of git the generator needs to materialise a source tree
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn clone_recursive(&self, url: &str, destination: &Path) -> Result<(), ProcessError>;
    async fn pull_all(&self, repo: &Path) -> Result<(), ProcessError>;
    async fn update_submodules(&self, repo: &Path) -> Result<(), ProcessError>;
    async fn checkout(&self, repo: &Path, reference: &str) -> Result<(), ProcessError>;
}

pub struct GitRunnerImpl {
    runner: Arc<dyn ProcessRunner>,
}

impl GitRunnerImpl {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// `git -C <repo>` prefix shared by every in-repository command
    fn in_repo(repo: &Path) -> ProcessCommandBuilder {
        ProcessCommandBuilder::new("git").arg("-C").path_arg(repo)
    }
}

#[async_trait]
impl GitRunner for GitRunnerImpl {
    async fn clone_recursive(&self, url: &str, destination: &Path) -> Result<(), ProcessError> {
        let command = ProcessCommandBuilder::new("git")
            .args(["clone", "--recurse-submodules", url])
            .path_arg(destination)
            .build();
        run_checked(self.runner.as_ref(), command).await
    }

    async fn pull_all(&self, repo: &Path) -> Result<(), ProcessError> {
        let command = Self::in_repo(repo).args(["pull", "--all"]).build();
        run_checked(self.runner.as_ref(), command).await
    }

    async fn update_submodules(&self, repo: &Path) -> Result<(), ProcessError> {
        let command = Self::in_repo(repo)
            .args(["submodule", "update", "--recursive"])
            .build();
        run_checked(self.runner.as_ref(), command).await
    }

    async fn checkout(&self, repo: &Path, reference: &str) -> Result<(), ProcessError> {
        let command = Self::in_repo(repo)
            .args(["-c", "advice.detachedHead=false", "checkout", reference])
            .build();
        run_checked(self.runner.as_ref(), command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::MockProcessRunner;

    #[tokio::test]
    async fn test_clone_uses_recursive_submodules() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("git").returns_success().finish();

        let git = GitRunnerImpl::new(Arc::new(mock.clone()));
        git.clone_recursive("https://example.com/repo.git", Path::new("/work/src/abc"))
            .await
            .unwrap();

        let history = mock.get_call_history();
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].args,
            vec![
                "clone",
                "--recurse-submodules",
                "https://example.com/repo.git",
                "/work/src/abc"
            ]
        );
    }

    #[tokio::test]
    async fn test_checkout_disables_detached_head_advice() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("git").returns_success().finish();

        let git = GitRunnerImpl::new(Arc::new(mock.clone()));
        git.checkout(Path::new("/work/src/abc"), "v1.2").await.unwrap();

        assert_eq!(
            mock.get_call_history()[0].args,
            vec![
                "-C",
                "/work/src/abc",
                "-c",
                "advice.detachedHead=false",
                "checkout",
                "v1.2"
            ]
        );
    }

    #[tokio::test]
    async fn test_pull_failure_is_reported() {
        let mut mock = MockProcessRunner::new();
        mock.expect_command("git")
            .with_args(|args| args.iter().any(|a| a == "pull"))
            .returns_stderr("fatal: unable to access remote")
            .returns_exit_code(128)
            .finish();

        let git = GitRunnerImpl::new(Arc::new(mock.clone()));
        let err = git.pull_all(Path::new("/work/src/abc")).await.unwrap_err();

        assert!(matches!(err, ProcessError::ExitCode { code: 128, .. }));
    }
}
