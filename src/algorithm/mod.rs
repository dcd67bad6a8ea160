//! One compiled algorithm variant: where its sources live, how they are
//! fetched and built, and which binary runs it

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub mod identity;
pub mod registry;

pub use identity::Identity;
pub use registry::BuildRegistry;

use crate::config::AlgorithmConfig;
use crate::layout::Layout;
use crate::subprocess::{CmakeRunner, GitRunner, ProcessError};

pub const HEAP_PROFILING_FLAG: &str = "-DKAMINPAR_ENABLE_HEAP_PROFILING=On";

/// Options passed to every cmake configure, before the user's compile flags
pub const BASELINE_CMAKE_OPTIONS: &[&str] = &[
    "-DCMAKE_BUILD_TYPE=Release",
    "-DKAMINPAR_BUILD_DISTRIBUTED=On",
    "-DKAMINPAR_BUILD_TESTS=Off",
    "-DKAMINPAR_BUILD_BENCHMARKS=On",
];

/// Length of a full commit hash
const PINNED_REF_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    Cloned,
    Updated,
    SkippedPinned,
}

#[derive(Debug, Clone)]
pub struct Algorithm {
    pub name: String,
    pub git_url: String,
    pub branch: String,
    pub target: String,
    pub compile_flags: Vec<String>,
    pub args: Vec<String>,
    identity: Identity,
    source_dir: PathBuf,
}

impl Algorithm {
    pub fn new(config: &AlgorithmConfig, layout: &Layout) -> Self {
        let identity = Identity::compute(&config.git_url, &config.branch, &config.compile_flags);
        let source_dir = layout.source_dir(&identity);
        Self {
            name: config.name.clone(),
            git_url: config.git_url.clone(),
            branch: config.branch.clone(),
            target: config.target.clone(),
            compile_flags: config.compile_flags.clone(),
            args: config.args.clone(),
            identity,
            source_dir,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_dir(&self) -> PathBuf {
        self.source_dir.join("build")
    }

    /// A 40 character ref is taken to be a commit hash
    pub fn is_pinned(&self) -> bool {
        self.branch.len() == PINNED_REF_LEN
    }

    pub fn heap_profiled(&self) -> bool {
        self.compile_flags.iter().any(|flag| flag == HEAP_PROFILING_FLAG)
    }

    pub fn binary_path(&self) -> PathBuf {
        let build = self.build_dir();
        match self.target.as_str() {
            "KaMinPar" | "dKaMinPar" => build.join("apps").join(&self.target),
            _ => build.join("benchmarks").join(&self.target),
        }
    }

    /// Baseline options followed by the compile flags split into shell words
    pub fn cmake_options(&self) -> Vec<String> {
        let mut options: Vec<String> = BASELINE_CMAKE_OPTIONS.iter().map(|o| o.to_string()).collect();
        for flag in &self.compile_flags {
            match shell_words::split(flag) {
                Ok(words) => options.extend(words),
                Err(_) => options.push(flag.clone()),
            }
        }
        options
    }

    /// Bring the source directory to `branch`
    pub async fn fetch(&self, git: &dyn GitRunner) -> Result<FetchOutcome, ProcessError> {
        let dir = &self.source_dir;
        let exists = dir.is_dir();

        if exists && self.is_pinned() {
            info!(
                "Directory {} for algorithm {} is pinned to {}: skipping fetch",
                dir.display(),
                self.name,
                self.branch
            );
            return Ok(FetchOutcome::SkippedPinned);
        }

        let outcome = if exists {
            info!(
                "Directory {} for algorithm {} already exists: updating from {}",
                dir.display(),
                self.name,
                self.git_url
            );
            git.pull_all(dir).await?;
            git.update_submodules(dir).await?;
            FetchOutcome::Updated
        } else {
            info!(
                "Directory {} for algorithm {} does not exist: cloning {}",
                dir.display(),
                self.name,
                self.git_url
            );
            git.clone_recursive(&self.git_url, dir).await?;
            FetchOutcome::Cloned
        };

        git.checkout(dir, &self.branch).await?;
        Ok(outcome)
    }

    pub async fn build(&self, cmake: &dyn CmakeRunner) -> Result<(), ProcessError> {
        info!(
            "Building target {} of algorithm {} in {}",
            self.target,
            self.name,
            self.build_dir().display()
        );
        let build_dir = self.build_dir();
        cmake
            .configure(&self.source_dir, &build_dir, &self.cmake_options())
            .await?;
        cmake.build(&build_dir, &self.target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::SubprocessManager;
    use tempfile::TempDir;

    fn config(branch: &str, target: &str, flags: &[&str]) -> AlgorithmConfig {
        AlgorithmConfig {
            name: "a".to_string(),
            git_url: "https://example.com/kaminpar.git".to_string(),
            branch: branch.to_string(),
            target: target.to_string(),
            compile_flags: flags.iter().map(|f| f.to_string()).collect(),
            args: vec!["--foo".to_string()],
        }
    }

    #[test]
    fn test_binary_path_by_target() {
        let layout = Layout::new("/work");
        let kaminpar = Algorithm::new(&config("main", "KaMinPar", &[]), &layout);
        let dist = Algorithm::new(&config("main", "dKaMinPar", &[]), &layout);
        let bench = Algorithm::new(&config("main", "shm_label_propagation_benchmark", &[]), &layout);

        assert_eq!(
            kaminpar.binary_path(),
            kaminpar.source_dir().join("build/apps/KaMinPar")
        );
        assert_eq!(
            dist.binary_path(),
            dist.source_dir().join("build/apps/dKaMinPar")
        );
        assert_eq!(
            bench.binary_path(),
            bench
                .source_dir()
                .join("build/benchmarks/shm_label_propagation_benchmark")
        );
    }

    #[test]
    fn test_source_dir_under_layout() {
        let layout = Layout::new("/work");
        let algorithm = Algorithm::new(&config("main", "KaMinPar", &[]), &layout);
        assert_eq!(
            algorithm.source_dir(),
            Path::new("/work/src").join(algorithm.identity().as_str())
        );
    }

    #[test]
    fn test_identity_ignores_name_target_and_args() {
        let layout = Layout::new("/work");
        let a = Algorithm::new(&config("main", "KaMinPar", &[]), &layout);
        let mut other = config("main", "dKaMinPar", &[]);
        other.name = "b".to_string();
        other.args = vec!["--bar".to_string()];
        let b = Algorithm::new(&other, &layout);

        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_pinned_and_heap_profiled() {
        let layout = Layout::new("/work");
        let pinned = Algorithm::new(
            &config("0123456789abcdef0123456789abcdef01234567", "KaMinPar", &[HEAP_PROFILING_FLAG]),
            &layout,
        );
        assert!(pinned.is_pinned());
        assert!(pinned.heap_profiled());

        let floating = Algorithm::new(&config("main", "KaMinPar", &["-DX=On"]), &layout);
        assert!(!floating.is_pinned());
        assert!(!floating.heap_profiled());
    }

    #[test]
    fn test_cmake_options_split_flags() {
        let layout = Layout::new("/work");
        let algorithm = Algorithm::new(&config("main", "KaMinPar", &["-DA=On -DB=Off"]), &layout);
        let options = algorithm.cmake_options();

        assert_eq!(&options[..4], BASELINE_CMAKE_OPTIONS);
        assert_eq!(&options[4..], ["-DA=On", "-DB=Off"]);
    }

    #[tokio::test]
    async fn test_fetch_clones_missing_directory() {
        let root = TempDir::new().unwrap();
        let layout = Layout::new(root.path());
        let algorithm = Algorithm::new(&config("v3.0", "KaMinPar", &[]), &layout);

        let (manager, mut mock) = SubprocessManager::mock();
        mock.expect_command("git").returns_success().times(2).finish();

        let outcome = algorithm.fetch(&manager.git()).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Cloned);
        let history = mock.get_call_history();
        assert_eq!(history[0].args[0], "clone");
        assert!(history[1].args.contains(&"checkout".to_string()));
        assert_eq!(history[1].args.last().map(String::as_str), Some("v3.0"));
    }

    #[tokio::test]
    async fn test_fetch_updates_existing_directory() {
        let root = TempDir::new().unwrap();
        let layout = Layout::new(root.path());
        let algorithm = Algorithm::new(&config("main", "KaMinPar", &[]), &layout);
        std::fs::create_dir_all(algorithm.source_dir()).unwrap();

        let (manager, mut mock) = SubprocessManager::mock();
        mock.expect_command("git").returns_success().times(3).finish();

        let outcome = algorithm.fetch(&manager.git()).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Updated);
        assert_eq!(mock.count_calls("git", |args| args.contains(&"pull".to_string())), 1);
        assert_eq!(
            mock.count_calls("git", |args| args.contains(&"submodule".to_string())),
            1
        );
        assert_eq!(mock.count_calls("git", |args| args.contains(&"clone".to_string())), 0);
    }

    #[tokio::test]
    async fn test_fetch_skips_pinned_existing_directory() {
        let root = TempDir::new().unwrap();
        let layout = Layout::new(root.path());
        let algorithm = Algorithm::new(
            &config("0123456789abcdef0123456789abcdef01234567", "KaMinPar", &[]),
            &layout,
        );
        std::fs::create_dir_all(algorithm.source_dir()).unwrap();

        let (manager, mock) = SubprocessManager::mock();
        let outcome = algorithm.fetch(&manager.git()).await.unwrap();

        assert_eq!(outcome, FetchOutcome::SkippedPinned);
        assert!(mock.get_call_history().is_empty());
    }

    #[tokio::test]
    async fn test_build_configures_then_builds() {
        let layout = Layout::new("/work");
        let algorithm = Algorithm::new(&config("main", "dKaMinPar", &["-DX=On"]), &layout);

        let (manager, mut mock) = SubprocessManager::mock();
        mock.expect_command("cmake").returns_success().times(2).finish();

        algorithm.build(&manager.cmake()).await.unwrap();

        let history = mock.get_call_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].args[0], "-S");
        assert_eq!(history[0].args.last().map(String::as_str), Some("-DX=On"));
        assert_eq!(history[1].args[0], "--build");
        assert!(history[1].args.contains(&"dKaMinPar".to_string()));
    }

    #[tokio::test]
    async fn test_build_failure_is_propagated() {
        let layout = Layout::new("/work");
        let algorithm = Algorithm::new(&config("main", "KaMinPar", &[]), &layout);

        let (manager, mut mock) = SubprocessManager::mock();
        mock.expect_command("cmake")
            .returns_stderr("CMake Error: could not find compiler")
            .returns_exit_code(1)
            .finish();

        let err = algorithm.build(&manager.cmake()).await.unwrap_err();
        assert!(matches!(err, ProcessError::ExitCode { code: 1, .. }));
        assert!(mock.verify_called("cmake", 1));
    }
}
