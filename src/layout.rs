//! Where generated files live below the working root
//!
//! ```text
//! <root>/Experiment.toml
//! <root>/submit.sh
//! <root>/submit-ordered.sh
//! <root>/scripts/ordered-starter.sh
//! <root>/scripts/<experiment>/starter.sh
//! <root>/scripts/<experiment>/<algorithm>.sh
//! <root>/logs/<experiment>/<algorithm>/<log files>
//! <root>/src/<identity>/build
//! ```

use std::path::{Component, Path, PathBuf};

use crate::algorithm::Identity;
use crate::config::CONFIG_FILE_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// `root` should be absolute so that generated scripts work from any directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Anchor a relative path at the root and drop `.` and `..` lexically
    ///
    /// Symlinks are not followed, so `a/link/..` becomes `a`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        normalize(&joined)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn submit_script(&self) -> PathBuf {
        self.root.join("submit.sh")
    }

    pub fn ordered_submit_script(&self) -> PathBuf {
        self.root.join("submit-ordered.sh")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    pub fn ordered_starter_script(&self) -> PathBuf {
        self.scripts_dir().join("ordered-starter.sh")
    }

    pub fn experiment_scripts_dir(&self, experiment: &str) -> PathBuf {
        self.scripts_dir().join(experiment)
    }

    pub fn starter_script(&self, experiment: &str) -> PathBuf {
        self.experiment_scripts_dir(experiment).join("starter.sh")
    }

    pub fn algorithm_script(&self, experiment: &str, algorithm: &str) -> PathBuf {
        self.experiment_scripts_dir(experiment)
            .join(format!("{algorithm}.sh"))
    }

    pub fn log_dir(&self, experiment: &str, algorithm: &str) -> PathBuf {
        self.root.join("logs").join(experiment).join(algorithm)
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn source_dir(&self, identity: &Identity) -> PathBuf {
        self.sources_dir().join(identity.as_str())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
